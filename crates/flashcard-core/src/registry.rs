#![forbid(unsafe_code)]

//! Box and group records.
//!
//! [`BoxRegistry`] exclusively owns every [`QuizBox`] and [`Group`]. Both are
//! kept in insertion-ordered maps keyed by id, which gives stable iteration
//! for rendering, export and bulk toggles.
//!
//! Box ids come from a counter that only moves forward: deleting `box3` never
//! makes `box3` available again, and importing a configuration seeds the
//! counter past the largest numeric suffix seen.

use indexmap::IndexMap;

use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::geometry::{BoxRect, Point, Size};
use crate::ids::{BoxId, GroupId};
use crate::link_index::LinkGroupIndex;

/// A clickable region over the image with a label/answer pair.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizBox {
    pub id: BoxId,
    /// Custom label; may be empty.
    pub label: String,
    /// Text revealed when the box is toggled; blank means "reveal nothing".
    pub answer: String,
    pub group: Option<GroupId>,
    /// Show the group's name instead of `label` when the group exists.
    pub use_group_label: bool,
    pub rect: BoxRect,
}

impl QuizBox {
    /// True when the answer has visible content.
    #[must_use]
    pub fn has_answer(&self) -> bool {
        !self.answer.trim().is_empty()
    }

    #[must_use]
    pub fn in_group(&self, id: &GroupId) -> bool {
        self.group.as_ref() == Some(id)
    }
}

/// A named, coloured tag shared by boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub color: String,
}

/// One editable field of a box, with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxProperty {
    Label(String),
    Answer(String),
    Group(Option<GroupId>),
    UseGroupLabel(bool),
    Rect(BoxRect),
}

impl BoxProperty {
    /// Persisted field name for this property.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::Answer(_) => "answer",
            Self::Group(_) => "group",
            Self::UseGroupLabel(_) => "useGroupLabel",
            Self::Rect(_) => "rect",
        }
    }

    /// Whether the edit can change what the box currently displays.
    #[must_use]
    pub fn affects_display(&self) -> bool {
        !matches!(self, Self::Rect(_))
    }
}

/// Owner of all box and group records.
#[derive(Debug, Clone)]
pub struct BoxRegistry {
    boxes: IndexMap<BoxId, QuizBox>,
    groups: IndexMap<GroupId, Group>,
    next_id: u64,
    config: QuizConfig,
}

impl Default for BoxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QuizConfig::default())
    }

    #[must_use]
    pub fn with_config(config: QuizConfig) -> Self {
        Self {
            boxes: IndexMap::new(),
            groups: IndexMap::new(),
            next_id: 1,
            config,
        }
    }

    /// Rebuild a registry from imported records.
    ///
    /// The id counter is seeded to `max(numeric suffix) + 1`.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`] when two boxes share an id or a
    /// numeric suffix leaves no room for the counter.
    pub fn restore(
        boxes: impl IntoIterator<Item = QuizBox>,
        groups: impl IntoIterator<Item = Group>,
        config: QuizConfig,
    ) -> Result<Self> {
        let mut registry = Self::with_config(config);
        for group in groups {
            registry.groups.insert(group.id.clone(), group);
        }
        for record in boxes {
            if registry.boxes.contains_key(&record.id) {
                return Err(QuizError::malformed(format!(
                    "duplicate box id: {}",
                    record.id
                )));
            }
            registry.boxes.insert(record.id.clone(), record);
        }
        let max_suffix = registry
            .boxes
            .keys()
            .map(BoxId::numeric_suffix)
            .max()
            .unwrap_or(0);
        registry.next_id = max_suffix
            .checked_add(1)
            .ok_or_else(|| QuizError::malformed(format!("box id suffix too large: {max_suffix}")))?;
        Ok(registry)
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Numeric suffix the next created box will receive.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    // ── Boxes ───────────────────────────────────────────────────────────

    /// Create a box at `position` (top-left corner) with `size`.
    ///
    /// The box gets a fresh `box<N>` id, the generated default label, an
    /// empty answer and no group.
    ///
    /// # Errors
    ///
    /// [`QuizError::IdsExhausted`] once the counter cannot advance.
    pub fn create_box(&mut self, position: Point, size: Size) -> Result<&QuizBox> {
        let id = self.allocate_id()?;
        let record = QuizBox {
            id: id.clone(),
            label: self.config.default_label(self.boxes.len()),
            answer: String::new(),
            group: None,
            use_group_label: false,
            rect: BoxRect::from_parts(position, size),
        };
        crate::debug!(box_id = %id, "box created");
        self.boxes.insert(id.clone(), record);
        self.require(&id)
    }

    /// Create a default-size box centred on `center`, kept on the canvas.
    ///
    /// # Errors
    ///
    /// [`QuizError::IdsExhausted`] once the counter cannot advance.
    pub fn create_box_centered(&mut self, center: Point) -> Result<&QuizBox> {
        let rect = BoxRect::centered_at(center, self.config.default_box_size);
        self.create_box(rect.origin(), rect.size())
    }

    /// Next `box<N>` id not held by any box. The counter only moves forward.
    fn allocate_id(&mut self) -> Result<BoxId> {
        loop {
            let n = self.next_id;
            let next = n.checked_add(1).ok_or(QuizError::IdsExhausted)?;
            self.next_id = next;
            let id = BoxId::from_sequence(n);
            if !self.boxes.contains_key(&id) {
                return Ok(id);
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: &BoxId) -> Option<&QuizBox> {
        self.boxes.get(id)
    }

    /// Like [`get`](Self::get), but unknown ids are an error.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown id.
    pub fn require(&self, id: &BoxId) -> Result<&QuizBox> {
        self.boxes.get(id).ok_or_else(|| QuizError::box_not_found(id))
    }

    #[must_use]
    pub fn contains(&self, id: &BoxId) -> bool {
        self.boxes.contains_key(id)
    }

    /// Boxes in creation order.
    pub fn boxes(&self) -> impl Iterator<Item = &QuizBox> {
        self.boxes.values()
    }

    pub fn box_ids(&self) -> impl Iterator<Item = &BoxId> {
        self.boxes.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Topmost box under `point`; later boxes are drawn above earlier ones.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&QuizBox> {
        self.boxes.values().rev().find(|b| b.rect.contains(point))
    }

    /// Set one field of a box.
    ///
    /// # Errors
    ///
    /// - [`QuizError::NotFound`] for an unknown box.
    /// - [`QuizError::NotFound`] when assigning a group that does not exist.
    pub fn update_property(&mut self, id: &BoxId, property: BoxProperty) -> Result<()> {
        if let BoxProperty::Group(Some(group)) = &property {
            if !self.groups.contains_key(group) {
                return Err(QuizError::group_not_found(group));
            }
        }
        let record = self
            .boxes
            .get_mut(id)
            .ok_or_else(|| QuizError::box_not_found(id))?;
        crate::trace!(box_id = %id, key = property.key(), "box property updated");
        match property {
            BoxProperty::Label(label) => record.label = label,
            BoxProperty::Answer(answer) => record.answer = answer,
            BoxProperty::Group(group) => record.group = group,
            BoxProperty::UseGroupLabel(flag) => record.use_group_label = flag,
            BoxProperty::Rect(rect) => record.rect = rect,
        }
        Ok(())
    }

    /// Remove a box and drop it from its link group.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown id; `links` is left untouched.
    pub fn delete_box(&mut self, id: &BoxId, links: &mut LinkGroupIndex) -> Result<QuizBox> {
        let record = self
            .boxes
            .shift_remove(id)
            .ok_or_else(|| QuizError::box_not_found(id))?;
        links.remove_id(id);
        crate::debug!(box_id = %id, "box deleted");
        Ok(record)
    }

    /// Remove every box and link group. Groups are kept; the id counter is not reset.
    pub fn clear_boxes(&mut self, links: &mut LinkGroupIndex) {
        self.boxes.clear();
        links.clear();
    }

    // ── Groups ──────────────────────────────────────────────────────────

    /// Add a group and return its derived id.
    ///
    /// The name is trimmed; the id is the lower-cased name with every
    /// character outside `[a-z0-9]` removed.
    ///
    /// # Errors
    ///
    /// - [`QuizError::EmptyName`] when the derived id is empty.
    /// - [`QuizError::DuplicateGroup`] when the derived id already exists.
    pub fn add_group(&mut self, name: &str, color: impl Into<String>) -> Result<GroupId> {
        let name = name.trim();
        let id = GroupId::derive(name).ok_or(QuizError::EmptyName)?;
        if self.groups.contains_key(&id) {
            return Err(QuizError::DuplicateGroup { id: id.to_string() });
        }
        crate::debug!(group_id = %id, "group added");
        self.groups.insert(
            id.clone(),
            Group {
                id: id.clone(),
                name: name.to_string(),
                color: color.into(),
            },
        );
        Ok(id)
    }

    /// Delete a group and clear it from every box that referenced it.
    ///
    /// Unknown ids are a silent no-op returning `None`.
    pub fn delete_group(&mut self, id: &GroupId) -> Option<Group> {
        let group = self.groups.shift_remove(id)?;
        for record in self.boxes.values_mut() {
            if record.in_group(id) {
                record.group = None;
            }
        }
        crate::debug!(group_id = %id, "group deleted");
        Some(group)
    }

    /// Rename a group. Its id does not change.
    ///
    /// # Errors
    ///
    /// - [`QuizError::NotFound`] for an unknown group.
    /// - [`QuizError::EmptyName`] when the trimmed name is empty.
    /// - [`QuizError::DuplicateGroup`] when another group already has the
    ///   name (compared case-insensitively).
    pub fn rename_group(&mut self, id: &GroupId, new_name: &str) -> Result<()> {
        if !self.groups.contains_key(id) {
            return Err(QuizError::group_not_found(id));
        }
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(QuizError::EmptyName);
        }
        let wanted = new_name.to_lowercase();
        if let Some(other) = self
            .groups
            .values()
            .find(|g| g.id != *id && g.name.to_lowercase() == wanted)
        {
            return Err(QuizError::DuplicateGroup {
                id: other.id.to_string(),
            });
        }
        if let Some(group) = self.groups.get_mut(id) {
            group.name = new_name.to_string();
        }
        crate::debug!(group_id = %id, "group renamed");
        Ok(())
    }

    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown group.
    pub fn set_group_color(&mut self, id: &GroupId, color: impl Into<String>) -> Result<()> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| QuizError::group_not_found(id))?;
        group.color = color.into();
        Ok(())
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Boxes assigned to `id`, in creation order.
    pub fn boxes_in_group<'a>(&'a self, id: &'a GroupId) -> impl Iterator<Item = &'a QuizBox> {
        self.boxes.values().filter(move |b| b.in_group(id))
    }

    // ── Presentation helpers ────────────────────────────────────────────

    /// Text a box shows in its label state.
    ///
    /// The group's name when `use_group_label` is set and the group exists,
    /// otherwise the custom label (possibly empty).
    #[must_use]
    pub fn display_label<'a>(&'a self, record: &'a QuizBox) -> &'a str {
        if record.use_group_label {
            if let Some(group) = record.group.as_ref().and_then(|g| self.groups.get(g)) {
                return &group.name;
            }
        }
        &record.label
    }

    /// Border colour: the group's colour, or the configured fallback.
    #[must_use]
    pub fn box_color<'a>(&'a self, record: &'a QuizBox) -> &'a str {
        record
            .group
            .as_ref()
            .and_then(|g| self.groups.get(g))
            .map_or(self.config.fallback_color.as_str(), |g| g.color.as_str())
    }
}
