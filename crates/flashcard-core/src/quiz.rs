#![forbid(unsafe_code)]

//! The quiz facade.
//!
//! [`Quiz`] owns the registry, the link partition, the visibility engine,
//! the persisted settings and the drag guard, and is the only type a host
//! needs to drive an editor or a player. Every operation that can change
//! what a box shows takes a [`PresentationAdapter`] and reports each
//! affected box to it.
//!
//! Failed operations leave the quiz untouched, including the drag guard and
//! the displayed states.

use crate::codec::{ConfigCodec, ConfigDocument, ImportedConfig};
use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::geometry::{Point, Size};
use crate::ids::{BoxId, GroupId};
use crate::interaction::{DragGuard, DragKind};
use crate::link_index::LinkGroupIndex;
use crate::registry::{BoxProperty, BoxRegistry, Group, QuizBox};
use crate::settings::QuizSettings;
use crate::visibility::{
    BoxDisplay, BulkToggle, DisplayedState, PresentationAdapter, VisibilityEngine,
};

/// A complete quiz: boxes, groups, links, displayed states and settings.
#[derive(Debug, Clone, Default)]
pub struct Quiz {
    registry: BoxRegistry,
    links: LinkGroupIndex,
    engine: VisibilityEngine,
    settings: QuizSettings,
    drag: DragGuard,
}

impl Quiz {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: QuizConfig) -> Self {
        Self {
            registry: BoxRegistry::with_config(config),
            ..Self::default()
        }
    }

    /// Parse an exported configuration. Every box starts in `Label`.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`] when the text is not a valid
    /// configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, QuizConfig::default())
    }

    /// Like [`from_json`](Self::from_json), with a custom [`QuizConfig`].
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`] when the text is not a valid
    /// configuration.
    pub fn from_json_with(json: &str, config: QuizConfig) -> Result<Self> {
        ConfigCodec::with_config(config)
            .import_json(json)
            .map(Self::from)
    }

    /// Replace the whole quiz with an imported configuration and report
    /// every box of the new quiz in `Label`.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`]; the current quiz is kept.
    pub fn load_json(&mut self, json: &str, adapter: &mut dyn PresentationAdapter) -> Result<()> {
        let imported = ConfigCodec::with_config(self.registry.config().clone()).import_json(json)?;
        *self = Self::from(imported);
        self.engine.reset(&self.registry, adapter);
        Ok(())
    }

    #[must_use]
    pub fn export(&self) -> ConfigDocument {
        self.codec().export(&self.registry, &self.links, &self.settings)
    }

    /// Pretty-printed JSON of the current quiz.
    ///
    /// # Errors
    ///
    /// [`QuizError::MalformedConfig`] if a value cannot be written as JSON.
    pub fn to_json(&self) -> Result<String> {
        self.codec()
            .export_json(&self.registry, &self.links, &self.settings)
    }

    fn codec(&self) -> ConfigCodec {
        ConfigCodec::with_config(self.registry.config().clone())
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub fn registry(&self) -> &BoxRegistry {
        &self.registry
    }

    #[must_use]
    pub fn links(&self) -> &LinkGroupIndex {
        &self.links
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut QuizSettings {
        &mut self.settings
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        self.registry.config()
    }

    #[must_use]
    pub fn get_box(&self, id: &BoxId) -> Option<&QuizBox> {
        self.registry.get(id)
    }

    /// Current state of a box; unknown ids read as `Label`.
    #[must_use]
    pub fn state(&self, id: &BoxId) -> DisplayedState {
        self.engine.state(id)
    }

    /// Text and transparency a view should render for a box.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn displayed_state(&self, id: &BoxId) -> Result<BoxDisplay> {
        let record = self.registry.require(id)?;
        Ok(self.engine.display(&self.registry, record))
    }

    /// True if any box of `group` is showing its label.
    #[must_use]
    pub fn group_has_label(&self, group: &GroupId) -> bool {
        self.engine
            .any_in_label(self.registry.boxes_in_group(group).map(|b| &b.id))
    }

    /// True if any box is showing its label.
    #[must_use]
    pub fn any_in_label(&self) -> bool {
        self.engine.any_in_label(self.registry.box_ids())
    }

    // ── Boxes ───────────────────────────────────────────────────────────

    /// Create a box and report it in `Label`.
    ///
    /// # Errors
    ///
    /// [`QuizError::IdsExhausted`] once the id counter cannot advance.
    pub fn create_box(
        &mut self,
        position: Point,
        size: Size,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<BoxId> {
        let id = self.registry.create_box(position, size)?.id.clone();
        self.announce(&id, adapter);
        Ok(id)
    }

    /// Create a default-size box centred on `center`, kept on the image.
    ///
    /// # Errors
    ///
    /// [`QuizError::IdsExhausted`] once the id counter cannot advance.
    pub fn create_box_centered(
        &mut self,
        center: Point,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<BoxId> {
        let id = self.registry.create_box_centered(center)?.id.clone();
        self.announce(&id, adapter);
        Ok(id)
    }

    /// Set one field of a box, re-reporting it when its display can change.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box or an unknown target group.
    pub fn update_property(
        &mut self,
        id: &BoxId,
        property: BoxProperty,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<()> {
        let refresh = property.affects_display();
        self.registry.update_property(id, property)?;
        if refresh {
            self.engine.refresh(&self.registry, id, adapter)?;
        }
        Ok(())
    }

    /// Delete a box, dropping it from its link group and the state table.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn delete_box(&mut self, id: &BoxId) -> Result<QuizBox> {
        let record = self.registry.delete_box(id, &mut self.links)?;
        self.engine.forget(id);
        Ok(record)
    }

    /// Delete every listed box that exists; unknown ids are skipped.
    pub fn delete_boxes<'a>(&mut self, ids: impl IntoIterator<Item = &'a BoxId>) -> Vec<QuizBox> {
        ids.into_iter()
            .filter_map(|id| self.delete_box(id).ok())
            .collect()
    }

    /// Remove every box and link group. Groups and settings are kept.
    pub fn clear(&mut self) {
        self.registry.clear_boxes(&mut self.links);
        self.engine.clear();
        self.drag.cancel();
        crate::debug!("quiz cleared");
    }

    // ── Groups ──────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// [`QuizError::EmptyName`] or [`QuizError::DuplicateGroup`].
    pub fn add_group(&mut self, name: &str, color: impl Into<String>) -> Result<GroupId> {
        self.registry.add_group(name, color)
    }

    /// Delete a group and re-report its former members. Unknown ids are a
    /// no-op.
    pub fn delete_group(
        &mut self,
        id: &GroupId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Option<Group> {
        let members = self.member_ids(id);
        let group = self.registry.delete_group(id)?;
        self.refresh_all(&members, adapter);
        Some(group)
    }

    /// # Errors
    ///
    /// [`QuizError::NotFound`], [`QuizError::EmptyName`] or
    /// [`QuizError::DuplicateGroup`].
    pub fn rename_group(
        &mut self,
        id: &GroupId,
        new_name: &str,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<()> {
        self.registry.rename_group(id, new_name)?;
        let members = self.member_ids(id);
        self.refresh_all(&members, adapter);
        Ok(())
    }

    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown group.
    pub fn set_group_color(
        &mut self,
        id: &GroupId,
        color: impl Into<String>,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<()> {
        self.registry.set_group_color(id, color)?;
        let members = self.member_ids(id);
        self.refresh_all(&members, adapter);
        Ok(())
    }

    /// Border colour of a box: its group's colour or the fallback.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn box_color(&self, id: &BoxId) -> Result<&str> {
        let record = self.registry.require(id)?;
        Ok(self.registry.box_color(record))
    }

    // ── Links ───────────────────────────────────────────────────────────

    /// Link the given boxes into one group, dissolving prior memberships.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] if any box is unknown, then the errors of
    /// [`LinkGroupIndex::link`].
    pub fn link<I>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = BoxId>,
    {
        let ids: Vec<BoxId> = ids.into_iter().collect();
        if let Some(missing) = ids.iter().find(|id| !self.registry.contains(id)) {
            return Err(QuizError::box_not_found(missing));
        }
        self.links.link(ids)
    }

    /// # Errors
    ///
    /// [`QuizError::NotFound`] or [`QuizError::SelfLink`].
    pub fn link_pair(&mut self, a: BoxId, b: BoxId) -> Result<()> {
        self.link([a, b])
    }

    /// Remove a box from its link group. Returns whether it was linked.
    pub fn unlink(&mut self, id: &BoxId) -> bool {
        self.links.unlink(id)
    }

    /// Unlink every listed box; returns how many were linked.
    pub fn unlink_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a BoxId>) -> usize {
        ids.into_iter().filter(|id| self.links.unlink(id)).count()
    }

    #[must_use]
    pub fn linked_partners(&self, id: &BoxId) -> Vec<BoxId> {
        self.links.linked_partners(id)
    }

    // ── Visibility ──────────────────────────────────────────────────────

    /// Toggle one box, ignoring its link group.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn toggle(
        &mut self,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<DisplayedState> {
        self.engine.toggle(&self.registry, id, adapter)
    }

    /// Toggle a box and each of its link partners independently.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn toggle_linked(
        &mut self,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<DisplayedState> {
        self.engine
            .toggle_linked(&self.registry, &self.links, id, adapter)
    }

    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown group.
    pub fn toggle_group(
        &mut self,
        id: &GroupId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<BulkToggle> {
        self.engine.toggle_group(&self.registry, id, adapter)
    }

    pub fn toggle_all(&mut self, adapter: &mut dyn PresentationAdapter) -> BulkToggle {
        self.engine.toggle_all(&self.registry, adapter)
    }

    /// Put every box back in `Label`.
    pub fn reset(&mut self, adapter: &mut dyn PresentationAdapter) {
        self.engine.reset(&self.registry, adapter);
    }

    // ── Pointer input ───────────────────────────────────────────────────

    pub fn begin_drag(&mut self, kind: DragKind) {
        self.drag.begin(kind);
    }

    pub fn finish_drag(&mut self) -> Option<DragKind> {
        self.drag.finish()
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    #[must_use]
    pub fn drag_guard(&self) -> &DragGuard {
        &self.drag
    }

    /// Route a click on a box to [`toggle_linked`](Self::toggle_linked)
    /// unless the drag guard swallows it.
    ///
    /// Returns `Ok(None)` for a swallowed click.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box; the guard is untouched.
    pub fn click_box(
        &mut self,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<Option<DisplayedState>> {
        self.registry.require(id)?;
        if !self.drag.admit_click() {
            crate::trace!(box_id = %id, "click swallowed by drag guard");
            return Ok(None);
        }
        self.toggle_linked(id, adapter).map(Some)
    }

    /// Handle a click on empty image space by creating a centred box.
    ///
    /// Returns `Ok(None)` when the click lands on an existing box or the
    /// drag guard swallows it.
    ///
    /// # Errors
    ///
    /// [`QuizError::IdsExhausted`] once the id counter cannot advance.
    pub fn click_canvas(
        &mut self,
        point: Point,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<Option<BoxId>> {
        if !self.drag.admit_click() || self.registry.hit_test(point).is_some() {
            return Ok(None);
        }
        self.create_box_centered(point, adapter).map(Some)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn announce(&self, id: &BoxId, adapter: &mut dyn PresentationAdapter) {
        if let Some(record) = self.registry.get(id) {
            adapter.apply_displayed_state(id, &self.engine.display(&self.registry, record));
        }
    }

    fn member_ids(&self, group: &GroupId) -> Vec<BoxId> {
        self.registry
            .boxes_in_group(group)
            .map(|b| b.id.clone())
            .collect()
    }

    fn refresh_all(&mut self, ids: &[BoxId], adapter: &mut dyn PresentationAdapter) {
        for record in ids.iter().filter_map(|id| self.registry.get(id)) {
            self.engine.refresh_record(&self.registry, record, adapter);
        }
    }
}

impl From<ImportedConfig> for Quiz {
    fn from(imported: ImportedConfig) -> Self {
        Self {
            registry: imported.registry,
            links: imported.links,
            engine: VisibilityEngine::new(),
            settings: imported.settings,
            drag: DragGuard::new(),
        }
    }
}
