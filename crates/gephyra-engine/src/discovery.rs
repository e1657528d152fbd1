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

//! Scene descriptor walker.
//!
//! Walks the world's scene description front-to-back and yields a typed
//! descriptor for every model, model-level plugin, and sensor it finds. The
//! walker classifies by structure only — whether a descriptor's tag resolves
//! to a factory is the factory table's concern — and performs no
//! instantiation. Traversal order is deterministic: models in declared
//! order, each model's plugin declarations before its links, each link's
//! sensors in declared order.

use gephyra_core::descriptor::{ComponentDescriptor, ComponentKind, SceneBinding};
use gephyra_core::scene::{ElementKind, SceneElement};

/// Enumerates the component descriptors of one world.
///
/// The world element itself yields no descriptor; the bridge creates the
/// implicit world component before consuming this output. Elements missing a
/// `name` attribute are reported and skipped — discovery never aborts
/// because one entity is malformed or unrecognized.
pub fn enumerate(world: &SceneElement) -> Vec<ComponentDescriptor<'_>> {
    let world_name = world.name().unwrap_or_default();
    let mut descriptors = Vec::new();

    for model in world.children_of(ElementKind::Model) {
        let Some(model_name) = model.name() else {
            log::warn!("Discovery: skipping unnamed model element in world '{world_name}'");
            continue;
        };

        descriptors.push(ComponentDescriptor {
            kind: ComponentKind::Model,
            type_tag: "",
            display_name: model_name.to_string(),
            binding: SceneBinding::Model {
                world: world_name.to_string(),
                model: model_name.to_string(),
            },
            source: model,
        });

        for plugin in model.children_of(ElementKind::Plugin) {
            let Some(plugin_name) = plugin.name() else {
                log::warn!("Discovery: skipping unnamed plugin on model '{model_name}'");
                continue;
            };
            let Some(filename) = plugin.filename() else {
                log::warn!(
                    "Discovery: plugin '{plugin_name}' on model '{model_name}' declares no \
                     filename, skipping"
                );
                continue;
            };
            descriptors.push(ComponentDescriptor {
                kind: ComponentKind::Plugin,
                type_tag: filename,
                display_name: plugin_name.to_string(),
                binding: SceneBinding::ModelPlugin {
                    world: world_name.to_string(),
                    model: model_name.to_string(),
                    plugin: plugin_name.to_string(),
                },
                source: plugin,
            });
        }

        for link in model.children_of(ElementKind::Link) {
            let Some(link_name) = link.name() else {
                log::warn!("Discovery: skipping unnamed link on model '{model_name}'");
                continue;
            };
            for sensor in link.children_of(ElementKind::Sensor) {
                let Some(sensor_name) = sensor.name() else {
                    log::warn!(
                        "Discovery: skipping unnamed sensor on link '{model_name}/{link_name}'"
                    );
                    continue;
                };
                let Some(type_tag) = sensor.type_tag() else {
                    log::warn!(
                        "Discovery: sensor '{sensor_name}' on '{model_name}/{link_name}' \
                         declares no type, skipping"
                    );
                    continue;
                };
                descriptors.push(ComponentDescriptor {
                    kind: ComponentKind::Sensor,
                    type_tag,
                    display_name: sensor_name.to_string(),
                    binding: SceneBinding::Sensor {
                        world: world_name.to_string(),
                        model: model_name.to_string(),
                        link: link_name.to_string(),
                        sensor: sensor_name.to_string(),
                    },
                    source: sensor,
                });
            }
        }
    }

    log::debug!(
        "Discovery: world '{world_name}' yielded {} descriptors",
        descriptors.len()
    );
    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(name: &str, tag: &str) -> SceneElement {
        SceneElement::named(ElementKind::Sensor, name).with_attribute("type", tag)
    }

    fn sample_world() -> SceneElement {
        SceneElement::named(ElementKind::World, "harbor")
            .with_child(
                SceneElement::named(ElementKind::Model, "rover")
                    .with_child(
                        SceneElement::named(ElementKind::Plugin, "drive")
                            .with_attribute("filename", "libgephyra_thruster.so"),
                    )
                    .with_child(
                        SceneElement::named(ElementKind::Link, "chassis")
                            .with_child(sensor("front_scan", "ray"))
                            .with_child(sensor("eye", "camera")),
                    )
                    .with_child(
                        SceneElement::named(ElementKind::Link, "mast")
                            .with_child(sensor("heading", "imu")),
                    ),
            )
            .with_child(
                SceneElement::named(ElementKind::Model, "buoy").with_child(
                    SceneElement::named(ElementKind::Link, "float")
                        .with_child(sensor("fix", "gps")),
                ),
            )
    }

    #[test]
    fn traversal_order_is_plugins_then_links_then_next_model() {
        let world = sample_world();
        let names: Vec<_> = enumerate(&world)
            .iter()
            .map(|d| d.display_name.clone())
            .collect();
        assert_eq!(
            names,
            vec!["rover", "drive", "front_scan", "eye", "heading", "buoy", "fix"]
        );
    }

    #[test]
    fn discovery_is_reproducible() {
        let world = sample_world();
        let first: Vec<_> = enumerate(&world)
            .iter()
            .map(|d| (d.kind, d.display_name.clone()))
            .collect();
        let second: Vec<_> = enumerate(&world)
            .iter()
            .map(|d| (d.kind, d.display_name.clone()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unrecognized_tags_still_yield_descriptors() {
        // Classification is structural; tag resolution happens later.
        let world = SceneElement::named(ElementKind::World, "w").with_child(
            SceneElement::named(ElementKind::Model, "m").with_child(
                SceneElement::named(ElementKind::Link, "l")
                    .with_child(sensor("odd", "barometer"))
                    .with_child(sensor("scan", "ray")),
            ),
        );
        let descriptors = enumerate(&world);
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[1].type_tag, "barometer");
        assert_eq!(descriptors[2].type_tag, "ray");
    }

    #[test]
    fn malformed_elements_are_skipped_without_shifting_siblings() {
        let world = SceneElement::named(ElementKind::World, "w")
            .with_child(SceneElement::new(ElementKind::Model)) // unnamed
            .with_child(
                SceneElement::named(ElementKind::Model, "m").with_child(
                    SceneElement::named(ElementKind::Link, "l")
                        .with_child(SceneElement::named(ElementKind::Sensor, "untyped"))
                        .with_child(sensor("scan", "ray")),
                ),
            );
        let names: Vec<_> = enumerate(&world)
            .iter()
            .map(|d| d.display_name.clone())
            .collect();
        assert_eq!(names, vec!["m", "scan"]);
    }

    #[test]
    fn bindings_record_the_observed_scope() {
        let world = sample_world();
        let descriptors = enumerate(&world);
        assert_eq!(
            descriptors[4].binding,
            SceneBinding::Sensor {
                world: "harbor".to_string(),
                model: "rover".to_string(),
                link: "mast".to_string(),
                sensor: "heading".to_string(),
            }
        );
    }
}
