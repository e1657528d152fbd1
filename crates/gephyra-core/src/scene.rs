// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scene description tree handed to the bridge by the simulation host.
//!
//! The host translates its native world description into this tree once, at
//! world-creation time. The bridge only ever borrows it: traversal walks the
//! ordered children, and everything a component keeps afterwards is an owned
//! string copied out of an attribute. Child order is significant — it is the
//! declaration order of the host's description, and discovery order follows
//! it front-to-back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of one scene description element.
///
/// The set is closed: the bridge interprets exactly these element kinds and
/// nothing else. `Load` and `Task` only occur as children of a coordinating
/// plugin declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// One simulated environment containing models and global plugins.
    World,
    /// A rigid/articulated body grouping, containing links and plugins.
    Model,
    /// A rigid sub-part of a model that may carry sensors.
    Link,
    /// A perception device attached to a link.
    Sensor,
    /// A request to attach custom logic to a world or model.
    Plugin,
    /// A `load { path }` entry of a coordinating plugin declaration.
    Load,
    /// A `task { name, model, filename }` entry of a coordinating plugin
    /// declaration.
    Task,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            ElementKind::World => "world",
            ElementKind::Model => "model",
            ElementKind::Link => "link",
            ElementKind::Sensor => "sensor",
            ElementKind::Plugin => "plugin",
            ElementKind::Load => "load",
            ElementKind::Task => "task",
        };
        f.write_str(word)
    }
}

/// One node of the scene description.
///
/// Hosts build the tree with [`SceneElement::new`] / [`SceneElement::named`]
/// and the `with_*` builder methods, or deserialize it from their own
/// configuration format. Attributes are string-valued, as in the source
/// descriptions this mirrors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    kind: ElementKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<SceneElement>,
}

impl SceneElement {
    /// Creates an element of the given kind with no attributes or children.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element with its `name` attribute already set.
    pub fn named(kind: ElementKind, name: impl Into<String>) -> Self {
        Self::new(kind).with_attribute("name", name)
    }

    /// Sets one string attribute, replacing any previous value.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends one child, preserving declaration order.
    pub fn with_child(mut self, child: SceneElement) -> Self {
        self.children.push(child);
        self
    }

    /// Kind of this element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Looks up a string attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    /// The `type` attribute (sensor kind tags).
    pub fn type_tag(&self) -> Option<&str> {
        self.attribute("type")
    }

    /// The `filename` attribute (plugin binaries, task-model libraries).
    pub fn filename(&self) -> Option<&str> {
        self.attribute("filename")
    }

    /// The `path` attribute (`load` entries).
    pub fn path(&self) -> Option<&str> {
        self.attribute("path")
    }

    /// The `model` attribute (`task` entries).
    pub fn model_name(&self) -> Option<&str> {
        self.attribute("model")
    }

    /// All children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = &SceneElement> {
        self.children.iter()
    }

    /// Children of one kind, in declaration order.
    ///
    /// This is the first-of-kind / next-of-kind iteration of the scene
    /// description contract: siblings of other kinds are transparent and do
    /// not affect the relative order of the matching ones.
    pub fn children_of(&self, kind: ElementKind) -> impl Iterator<Item = &SceneElement> {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}
