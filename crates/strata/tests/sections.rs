//! Integration tests for sections as seen through the type-erased contract.

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use strata::TaskKey;
use strata::prelude::*;
use strata::section::{
    CellKind, DragDropConfig, HostingController, InteractionFlags, SelfSizingConfig,
    SelfSizingContext, bind,
};

#[derive(Debug, Clone, PartialEq)]
struct Card {
    id: u32,
    title: String,
}

impl Identifiable for Card {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

fn card(id: u32) -> Card {
    Card {
        id,
        title: format!("Card {id}"),
    }
}

fn cards(ids: &[u32]) -> Vec<Card> {
    ids.iter().copied().map(card).collect()
}

fn board(ids: &[u32]) -> Section<Card, u32, String> {
    Section::identified("board", cards(ids), |c: &Card, _| c.title.clone())
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

fn ids_of(binding: &Binding<Vec<Card>>) -> Vec<u32> {
    binding.with(|data| data.iter().map(|c| c.id).collect())
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_identity_round_trip_through_trait_object() {
    let section: Box<dyn SectionDataSource> = Box::new(board(&[4, 8, 15, 16]));
    for index in 0..section.count() {
        let id = section.unique_id_at(index).unwrap();
        assert_eq!(section.position_of(&id), Some(index));
    }

    let ids = section.unique_ids();
    assert_eq!(ids.len(), section.count());
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
}

#[test]
fn test_identity_follows_item_not_position() {
    let id = board(&[1, 2, 3]).unique_id_at(0).unwrap();
    let reordered = board(&[3, 2, 1]);
    let shrunk = board(&[2, 3]);

    assert_eq!(reordered.position_of(&id), Some(2));
    assert_eq!(shrunk.position_of(&id), None);
    assert!(shrunk.content_for_item(&id).is_none());
}

#[test]
fn test_type_erased_data_is_a_copy() {
    let section = board(&[9]);
    let data = section.type_erased_data(0).unwrap();
    assert_eq!(data.downcast_ref::<Card>(), Some(&card(9)));
}

// =============================================================================
// Content and hosts
// =============================================================================

#[test]
fn test_host_rebinds_in_place_and_refuses_other_types() {
    let section = board(&[1, 2]);
    let id = section.unique_id_at(1).unwrap();

    let mut host = section.update_or_create_host(&id, None).unwrap();
    let host_id = host.host_id();

    let updated = board(&[2, 1]);
    assert_eq!(updated.update_host(host.as_mut(), &id), HostUpdate::Updated);
    assert_eq!(host.host_id(), host_id);

    let numeric = Section::identified("board", cards(&[2]), |c: &Card, _| c.id);
    assert_eq!(numeric.update_host(host.as_mut(), &id), HostUpdate::NotApplicable);
    assert_eq!(
        host.downcast_ref::<String>().and_then(|h| h.content()).map(String::as_str),
        Some("Card 2")
    );

    let replaced = numeric.update_or_create_host(&id, Some(host)).unwrap();
    assert_ne!(replaced.host_id(), host_id);
    assert!(replaced.is_host_for::<u32>());
}

#[test]
fn test_unresolved_host_update() {
    let section = board(&[1]);
    let mut host: Box<dyn ContentHost> = Box::new(HostingController::<String>::new());
    let gone = UniqueId::from_ids("board", &99u32);

    assert_eq!(section.update_host(host.as_mut(), &gone), HostUpdate::Unresolved);
    assert!(!host.is_bound());
    assert!(section.update_or_create_host(&gone, None).is_none());
}

#[test]
fn test_interaction_flags_follow_drag_drop() {
    let data = Binding::new(cards(&[1]));
    let section = board(&[1]).with_drag_drop(DragDropConfig::new(data));
    let id = section.unique_id_at(0).unwrap();

    let host = section.update_or_create_host(&id, None).unwrap();
    assert_eq!(host.interaction_flags(), InteractionFlags::for_section(true, true));

    let plain = board(&[1]);
    let host = plain.update_or_create_host(&id, Some(host)).unwrap();
    assert_eq!(host.interaction_flags(), InteractionFlags::default());
}

#[test]
fn test_typed_bind_mismatch_is_an_error() {
    let mut host: Box<dyn ContentHost> = Box::new(HostingController::<String>::new());
    bind(host.as_mut(), "x".to_string(), InteractionFlags::default()).unwrap();
    let err = bind(host.as_mut(), 1u8, InteractionFlags::default()).unwrap_err();
    assert!(err.to_string().contains("u8"));
}

#[test]
fn test_supplementary_hosts() {
    let section = board(&[1]).with_header(Some("Backlog")).with_footer(Some(3usize));
    let header = section.update_or_create_supplementary_host("header", None).unwrap();
    assert!(header.is_host_for::<strata::section::AnyContent>());

    let mut footer = section.update_or_create_supplementary_host("footer", None).unwrap();
    let without_footer = board(&[1]);
    assert_eq!(
        without_footer.update_supplementary_host(footer.as_mut(), "footer"),
        HostUpdate::Unresolved
    );
    assert!(section.update_or_create_supplementary_host("missing", None).is_none());
}

#[test]
fn test_content_sees_selection_and_position() {
    let selection = Binding::new(HashSet::from([0]));
    let render_card = |c: &Card, cx: CellContext| {
        let selected = if cx.is_selected { "*" } else { "" };
        let last = if cx.is_last_in_section { "." } else { "" };
        format!("{}{selected}{last}", c.title)
    };
    let section =
        Section::identified("board", cards(&[1, 2]), render_card).with_selection(selection);

    let first = section.unique_id_at(0).unwrap();
    let last = section.unique_id_at(1).unwrap();
    let render = |id: UniqueId| {
        section
            .content_for_item(&id)
            .and_then(|c| c.downcast_ref::<String>().cloned())
    };
    assert_eq!(render(first).as_deref(), Some("Card 1*"));
    assert_eq!(render(last).as_deref(), Some("Card 2."));
}

// =============================================================================
// Lifecycle events
// =============================================================================

#[test]
fn test_appear_beyond_length_does_nothing() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let section = board(&[1, 2, 3]).with_cell_events(move |e| sink.lock().push(e));

    section.on_appear(IndexPath::new(0, 3));
    section.on_disappear(IndexPath::new(0, 42));
    assert!(events.lock().is_empty());

    section.on_appear(IndexPath::new(0, 2));
    assert_eq!(*events.lock(), vec![CellEvent::Appeared(card(3))]);
}

#[test]
fn test_prefetch_resolves_valid_paths_only() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let section = board(&[1, 2, 3]).with_cell_events(move |e| sink.lock().push(e));

    section.prefetch(&[IndexPath::new(0, 2), IndexPath::new(0, 7), IndexPath::new(0, 0)]);
    section.cancel_prefetch(&[IndexPath::new(0, 9)]);
    section.cancel_prefetch(&[IndexPath::new(0, 0)]);

    assert_eq!(
        *events.lock(),
        vec![
            CellEvent::Prefetch(vec![card(3), card(1)]),
            CellEvent::CancelPrefetch(vec![card(1)]),
        ]
    );
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_should_select_out_of_range_with_binding() {
    let section = board(&[1]).with_selection(Binding::default());
    assert!(section.should_select(IndexPath::new(0, 5)));
    assert!(section.should_deselect(IndexPath::new(0, 5)));
    assert!(!board(&[1]).should_select(IndexPath::new(0, 0)));
}

#[test]
fn test_selection_writes_coalesce_until_next_turn() {
    let selection = Binding::new(HashSet::new());
    let changes = Arc::new(Mutex::new(0));
    let counter = changes.clone();
    selection.changed().connect(move |_| *counter.lock() += 1);

    let section: Box<dyn SectionDataSource> =
        Box::new(board(&[1, 2, 3]).with_selection(selection.clone()));
    section.update_selection(HashSet::from([0]));
    section.update_selection(HashSet::from([1, 2]));

    assert_eq!(run_loop::pending_count(), 1);
    assert!(selection.get().is_empty());
    assert!(!section.is_selected(1));

    run_loop::process_pending();
    assert_eq!(selection.get(), HashSet::from([1, 2]));
    assert_eq!(*changes.lock(), 1);
    assert!(section.is_selected(2));
}

#[test]
fn test_rebuilt_section_shares_selection() {
    let selection = Binding::new(HashSet::new());
    let before = board(&[1, 2]).with_selection(selection.clone());
    before.update_selection(HashSet::from([1]));

    let after = board(&[1, 2, 3]).with_selection(selection);
    run_loop::process_pending();
    assert!(after.is_selected(1));
}

#[test]
fn test_sections_sharing_a_binding_last_write_wins() {
    let selection = Binding::new(HashSet::new());
    let cards_section = board(&[1, 2]).with_selection(selection.clone());
    let labels = Section::new("labels", vec!["a", "b"], |s: &&str| *s, |s: &&str, _| s.len())
        .with_selection(selection.clone());

    cards_section.update_selection(HashSet::from([0]));
    labels.update_selection(HashSet::from([1]));

    assert_eq!(run_loop::pending_count(), 1);
    assert!(selection.get().is_empty());

    run_loop::process_pending();
    assert_eq!(selection.get(), HashSet::from([1]));
    assert!(cards_section.is_selected(1) && labels.is_selected(1));
}

#[test]
fn test_selection_write_does_not_replace_application_task() {
    let selection = Binding::new(HashSet::new());
    let section = board(&[1, 2]).with_selection(selection.clone());

    let ran = Arc::new(Mutex::new(false));
    let flag = ran.clone();
    run_loop::post_coalesced(TaskKey::new(selection.id().as_u64()), move || {
        *flag.lock() = true
    });
    section.update_selection(HashSet::from([1]));

    assert_eq!(run_loop::pending_count(), 2);
    assert_eq!(run_loop::process_pending(), 2);
    assert!(*ran.lock());
    assert_eq!(selection.get(), HashSet::from([1]));
}

// =============================================================================
// Drag and drop
// =============================================================================

#[test]
fn test_insert_skips_existing_identifiers() {
    let data = Binding::new(cards(&[1, 2, 3]));
    let section = board(&[1, 2, 3]).with_drag_drop(DragDropConfig::new(data.clone()));
    let incoming: Vec<DragItem> = [2, 4]
        .into_iter()
        .map(|id| DragItem::new(ItemProvider::new()).with_local_object(card(id)))
        .collect();

    let (report, logs) = capture_logs(|| section.apply_insert(&incoming, 1));

    assert_eq!(ids_of(&data), vec![1, 4, 2, 3]);
    assert_eq!(report.offered, 2);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.duplicates, vec![section.unique_id_for(&card(2))]);
    assert!(!report.is_complete());
    assert!(logs.contains("WARN"), "expected a warning, got: {logs}");
    assert!(logs.contains("already exists"));
}

#[test]
fn test_insert_drops_duplicates_within_batch() {
    let data = Binding::new(Vec::new());
    let section = board(&[]).with_drag_drop(DragDropConfig::new(data.clone()));
    let incoming: Vec<DragItem> = [5, 5, 6]
        .into_iter()
        .map(|id| DragItem::new(ItemProvider::new()).with_local_object(card(id)))
        .collect();

    let report = section.apply_insert(&incoming, 10);
    assert_eq!(ids_of(&data), vec![5, 6]);
    assert_eq!(report.duplicates.len(), 1);
}

#[test]
fn test_insert_without_binding_is_noop() {
    let section = board(&[1]);
    let item = DragItem::new(ItemProvider::new()).with_local_object(card(2));
    let report = section.apply_insert(&[item], 0);
    assert_eq!(report.inserted, 0);
    assert!(!section.will_accept_drop(&DragItem::default()));
}

#[test]
fn test_remove_ignores_stale_offsets() {
    let data = Binding::new(cards(&[1, 2, 3, 4]));
    let section = board(&[1, 2, 3, 4]).with_drag_drop(DragDropConfig::reorderable(data.clone()));

    let removed = section.apply_remove(&BTreeSet::from([0, 2, 9]));
    assert_eq!(removed, 2);
    assert_eq!(ids_of(&data), vec![2, 4]);
}

#[test]
fn test_drag_item_carries_local_object_and_representations() {
    let config = DragDropConfig::drag_only()
        .with_drag_item_provider(|c: &Card| ItemProvider::from_text(c.title.clone()));
    let section = board(&[7]).with_drag_drop(config);

    let drag = section.drag_item(IndexPath::new(0, 0)).unwrap();
    assert_eq!(drag.local_object::<Card>(), Some(&card(7)));
    assert_eq!(drag.provider().text().as_deref(), Some("Card 7"));
    assert!(section.drag_item(IndexPath::new(0, 1)).is_none());
    assert!(board(&[7]).drag_item(IndexPath::new(0, 0)).is_none());
}

#[test]
fn test_drop_item_provider_maps_external_drags() {
    let data = Binding::new(cards(&[1]));
    let config = DragDropConfig::new(data.clone()).with_drop_item_provider(
        |local: Option<Card>, drag: &DragItem| {
            local.or_else(|| {
                let text = drag.provider().text()?;
                let id = text.strip_prefix("card:")?.parse().ok()?;
                Some(card(id))
            })
        },
    );
    let section = board(&[1]).with_drag_drop(config);

    let external = DragItem::new(ItemProvider::from_text("card:12"));
    let garbage = DragItem::new(ItemProvider::from_text("hello"));

    assert!(section.will_accept_drop(&external));
    assert!(!section.will_accept_drop(&garbage));
    assert_eq!(section.drop_item_id(&external), Some(section.unique_id_for(&card(12))));

    section.apply_insert(&[external, garbage], 0);
    assert_eq!(ids_of(&data), vec![12, 1]);
}

#[test]
fn test_reorder_between_sections() {
    let backlog = Binding::new(cards(&[1, 2, 3]));
    let done = Binding::new(cards(&[10]));

    let source = Section::identified("backlog", backlog.get(), |c: &Card, _| c.title.clone())
        .with_drag_drop(DragDropConfig::reorderable(backlog.clone()));
    let target = Section::identified("done", done.get(), |c: &Card, _| c.title.clone())
        .with_drag_drop(DragDropConfig::reorderable(done.clone()));

    let dragged = source.drag_item(IndexPath::new(0, 1)).unwrap();
    assert!(target.will_accept_drop(&dragged));
    assert_eq!(target.apply_insert(&[dragged], 1).inserted, 1);
    assert_eq!(source.apply_remove(&BTreeSet::from([1])), 1);

    assert_eq!(ids_of(&backlog), vec![1, 3]);
    assert_eq!(ids_of(&done), vec![10, 2]);
}

// =============================================================================
// Delete, menus, sizing
// =============================================================================

#[test]
fn test_swipe_to_delete_flow() {
    let data = Binding::new(cards(&[1, 2]));
    let store = data.clone();
    let section = board(&[1, 2])
        .with_swipe_to_delete(move |index, _: &Card, done| {
            store.update(|d| {
                d.remove(index);
            });
            done(true);
        })
        .with_swipe_to_delete_predicate(|index| index > 0);

    assert!(!section.supports_delete(IndexPath::new(0, 0)));
    assert!(section.supports_delete(IndexPath::new(0, 1)));

    let outcome = Arc::new(Mutex::new(None));
    let slot = outcome.clone();
    section.delete(IndexPath::new(0, 1), Box::new(move |ok| *slot.lock() = Some(ok)));
    assert_eq!(*outcome.lock(), Some(true));
    assert_eq!(ids_of(&data), vec![1]);

    let slot = outcome.clone();
    section.delete(IndexPath::new(0, 5), Box::new(move |ok| *slot.lock() = Some(ok)));
    assert_eq!(*outcome.lock(), Some(false));
}

#[test]
fn test_menu_and_sizing_through_trait_object() {
    let section: Box<dyn SectionDataSource> = Box::new(
        board(&[1])
            .with_context_menu(|_, c: &Card| {
                Some(strata::section::ContextMenu::new().with_title(c.title.clone()))
            })
            .with_self_sizing(|cx: &SelfSizingContext| match &cx.cell_kind {
                CellKind::Supplementary(kind) if kind == "header" => {
                    Some(SelfSizingConfig::default().with_vertical(true))
                }
                _ => None,
            }),
    );

    let menu = section.context_menu(IndexPath::new(0, 0)).unwrap();
    assert_eq!(menu.title(), Some("Card 1"));
    assert!(section.context_menu(IndexPath::new(0, 1)).is_none());

    let header = SelfSizingContext::supplementary("header", IndexPath::new(0, 0));
    assert_eq!(
        section.self_sizing(&header).and_then(|c| c.self_size_vertically),
        Some(true)
    );
    assert!(section.self_sizing(&SelfSizingContext::content(IndexPath::new(0, 0))).is_none());
}

// =============================================================================
// Containers
// =============================================================================

#[test]
fn test_heterogeneous_list_and_host_cache() {
    let labels = Section::new("labels", vec!["todo", "done"], |s: &&str| *s, |s: &&str, _| {
        s.to_uppercase()
    });
    let sections = SectionList::new().with(board(&[1, 2])).with(labels);
    assert_eq!(sections.total_count(), 4);

    let mut cache = HostCache::new();
    for (index, id) in sections.unique_ids() {
        let section = sections.get(index).unwrap();
        assert!(cache.host_for_item(section, &id).is_some());
    }
    assert_eq!(cache.len(), 4);

    let next = SectionList::new().with(board(&[2]));
    assert_eq!(cache.prune_to(&next), 3);
    let id = next.get(0).and_then(|s| s.unique_id_at(0)).unwrap();
    assert_eq!(next.index_path_of(&id), Some(IndexPath::new(0, 0)));
    assert_eq!(cache.refresh_item(next.get(0).unwrap(), &id), HostUpdate::Updated);
}

#[test]
fn test_cell_caching_flag() {
    assert!(!board(&[1]).should_cache_cells());
    assert!(board(&[1]).with_cell_caching(true).should_cache_cells());
}
