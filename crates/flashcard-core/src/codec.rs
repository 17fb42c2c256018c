#![forbid(unsafe_code)]

//! JSON configuration format.
//!
//! # File Format
//!
//! ```json
//! {
//!   "image": "europe.png",
//!   "imageDisplayDimensions": { "width": 800, "height": 600 },
//!   "groups": { "capitals": { "name": "Capitals", "color": "#ef4444", "boxes": [] } },
//!   "boxes": [
//!     { "id": "box1", "label": "", "answer": "Paris",
//!       "x": 40, "y": 30, "width": 12, "height": 8,
//!       "group": "capitals", "useGroupLabel": true }
//!   ],
//!   "linkGroups": [["box1", "box2"]],
//!   "controlsPosition": "right",
//!   "controlsOffsetX": 0,
//!   "controlsOffsetY": 0
//! }
//! ```
//!
//! # Legacy links
//!
//! Older files carry `linkedBoxes: { "box1": "box2" }` instead of
//! `linkGroups`. Each pair becomes a two-member link group; a pair touching a
//! box already consumed by an earlier pair is dropped. `linkGroups` wins when
//! both are present. Only `linkGroups` is ever written.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Invalid JSON / wrong shape | Corrupt or foreign file | `MalformedConfig`, nothing built |
//! | Duplicate box id | Hand-edited file | `MalformedConfig` |
//! | Link to unknown box | Box deleted outside the editor | Reference dropped before overlaps are resolved (logged) |
//! | Overlapping link groups | Hand-edited file | First list wins, later references dropped (logged) |
//! | Box in unknown group | Group deleted outside the editor | Kept; label falls back to the custom label |

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::QuizConfig;
use crate::error::Result;
use crate::geometry::BoxRect;
use crate::ids::{BoxId, GroupId};
use crate::link_index::LinkGroupIndex;
use crate::registry::{BoxRegistry, Group, QuizBox};
use crate::settings::{ControlsPosition, ImageDimensions, QuizSettings};

/// Persisted shape of a whole quiz.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default)]
    pub image_display_dimensions: Option<ImageDimensions>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: IndexMap<String, GroupRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub boxes: Vec<BoxRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_groups: Option<Vec<Vec<BoxId>>>,
    /// Legacy one-to-one links; read, never written.
    #[serde(default, skip_serializing)]
    pub linked_boxes: Option<IndexMap<String, Option<String>>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub controls_position: ControlsPosition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub controls_offset_x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub controls_offset_y: f64,
}

/// Persisted group, keyed by its id in [`ConfigDocument::groups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    /// Written empty for compatibility; membership lives in each box's
    /// `group` field and this list is ignored on import.
    #[serde(default, deserialize_with = "null_as_default")]
    pub boxes: Vec<BoxId>,
}

/// Persisted box. An empty `group` means "no group".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxRecord {
    pub id: BoxId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_group_label: bool,
}

impl From<&QuizBox> for BoxRecord {
    fn from(record: &QuizBox) -> Self {
        Self {
            id: record.id.clone(),
            label: record.label.clone(),
            answer: record.answer.clone(),
            x: record.rect.x,
            y: record.rect.y,
            width: record.rect.width,
            height: record.rect.height,
            group: record
                .group
                .as_ref()
                .map(|g| g.as_str().to_string())
                .unwrap_or_default(),
            use_group_label: record.use_group_label,
        }
    }
}

impl From<BoxRecord> for QuizBox {
    fn from(record: BoxRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            answer: record.answer,
            group: (!record.group.is_empty()).then(|| GroupId::new(record.group)),
            use_group_label: record.use_group_label,
            rect: BoxRect::new(record.x, record.y, record.width, record.height),
        }
    }
}

/// Everything rebuilt from an imported configuration.
#[derive(Debug, Clone)]
pub struct ImportedConfig {
    pub registry: BoxRegistry,
    pub links: LinkGroupIndex,
    pub settings: QuizSettings,
}

/// Converts quizzes to and from [`ConfigDocument`] / JSON text.
#[derive(Debug, Clone, Default)]
pub struct ConfigCodec {
    config: QuizConfig,
}

impl ConfigCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec whose imported registries use `config` for later edits.
    #[must_use]
    pub fn with_config(config: QuizConfig) -> Self {
        Self { config }
    }

    /// Snapshot the quiz into its persisted shape.
    #[must_use]
    pub fn export(
        &self,
        registry: &BoxRegistry,
        links: &LinkGroupIndex,
        settings: &QuizSettings,
    ) -> ConfigDocument {
        ConfigDocument {
            image: settings.image.clone(),
            image_display_dimensions: settings.image_display_dimensions,
            groups: registry
                .groups()
                .map(|g| {
                    (
                        g.id.as_str().to_string(),
                        GroupRecord {
                            name: g.name.clone(),
                            color: g.color.clone(),
                            boxes: Vec::new(),
                        },
                    )
                })
                .collect(),
            boxes: registry.boxes().map(BoxRecord::from).collect(),
            link_groups: Some(links.to_id_lists()),
            linked_boxes: None,
            controls_position: settings.controls_position,
            controls_offset_x: settings.controls_offset_x,
            controls_offset_y: settings.controls_offset_y,
        }
    }

    /// Export as pretty-printed JSON (two-space indent).
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`](crate::QuizError::MalformedConfig) if a
    /// value cannot be represented in JSON (a non-finite coordinate).
    pub fn export_json(
        &self,
        registry: &BoxRegistry,
        links: &LinkGroupIndex,
        settings: &QuizSettings,
    ) -> Result<String> {
        let document = self.export(registry, links, settings);
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Rebuild registry, link index and settings from a document.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`](crate::QuizError::MalformedConfig) for
    /// duplicate box ids.
    pub fn import(&self, document: ConfigDocument) -> Result<ImportedConfig> {
        let ConfigDocument {
            image,
            image_display_dimensions,
            groups,
            boxes,
            link_groups,
            linked_boxes,
            controls_position,
            controls_offset_x,
            controls_offset_y,
        } = document;

        let groups = groups.into_iter().map(|(id, record)| Group {
            id: GroupId::new(id),
            name: record.name,
            color: record.color,
        });
        let registry = BoxRegistry::restore(
            boxes.into_iter().map(QuizBox::from),
            groups,
            self.config.clone(),
        )?;

        // Unknown ids go first so they never claim a box in first-wins order.
        let mut dangling = 0;
        let (links, dropped) = match (link_groups, linked_boxes) {
            (Some(lists), _) => {
                let lists: Vec<Vec<BoxId>> = lists
                    .into_iter()
                    .map(|list| {
                        let before = list.len();
                        let known: Vec<BoxId> =
                            list.into_iter().filter(|id| registry.contains(id)).collect();
                        dangling += before - known.len();
                        known
                    })
                    .collect();
                LinkGroupIndex::from_lists_first_wins(lists)
            }
            (None, Some(legacy)) => {
                let pairs: Vec<(BoxId, BoxId)> = legacy_pairs(legacy)
                    .filter(|(from, to)| {
                        let known = registry.contains(from) && registry.contains(to);
                        if !known {
                            dangling += 1;
                        }
                        known
                    })
                    .collect();
                LinkGroupIndex::from_legacy_pairs(pairs)
            }
            (None, None) => (LinkGroupIndex::new(), 0),
        };
        if dropped + dangling > 0 {
            crate::warn!(
                overlapping = dropped,
                dangling,
                "dropped link references while importing"
            );
        }

        let settings = QuizSettings {
            image,
            image_display_dimensions,
            controls_position,
            controls_offset_x,
            controls_offset_y,
        };
        crate::info!(
            boxes = registry.len(),
            groups = registry.group_count(),
            link_groups = links.len(),
            "configuration imported"
        );
        Ok(ImportedConfig {
            registry,
            links,
            settings,
        })
    }

    /// Parse and import JSON text.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`](crate::QuizError::MalformedConfig) when
    /// the text is not a valid configuration.
    pub fn import_json(&self, json: &str) -> Result<ImportedConfig> {
        let document: ConfigDocument = serde_json::from_str(json)?;
        self.import(document)
    }

    /// Import an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`](crate::QuizError::MalformedConfig) when
    /// the value does not have the configuration shape.
    pub fn import_value(&self, value: serde_json::Value) -> Result<ImportedConfig> {
        let document: ConfigDocument = serde_json::from_value(value)?;
        self.import(document)
    }
}

fn legacy_pairs(legacy: IndexMap<String, Option<String>>) -> impl Iterator<Item = (BoxId, BoxId)> {
    legacy.into_iter().filter_map(|(from, to)| match to {
        Some(to) if !to.is_empty() => Some((BoxId::new(from), BoxId::new(to))),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
