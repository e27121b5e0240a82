//! Engine behavior tests: window trimming, navigation flags, boundary
//! cursors, forward/backward symmetry and anchor degradation.

use crate::page::{
    decode_cursor, encode_cursor, Cursor, OrderSpec, PageRequest, SortDirection, SortValue,
    DEFAULT_PAGE_SIZE,
};

use super::mocks::{engine_over, Row, RowFilter};

fn rows_a_to_f() -> Vec<Row> {
    vec![
        Row::new(1, "alpha"),
        Row::new(2, "bravo"),
        Row::new(3, "charlie"),
        Row::new(4, "delta"),
        Row::new(5, "echo"),
        Row::new(6, "foxtrot"),
    ]
}

fn name_asc() -> OrderSpec {
    OrderSpec::new("name", SortDirection::Asc)
}

fn ids(page: &crate::page::Page<Row>) -> Vec<i64> {
    page.items.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_first_page_without_anchor() {
    let engine = engine_over(rows_a_to_f());
    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &PageRequest::forward(2, None))
        .await
        .unwrap();

    assert_eq!(ids(&page), [1, 2]);
    assert!(page.info.has_next);
    assert!(!page.info.has_previous);
    assert_eq!(page.info.total_count, 6);
}

#[tokio::test]
async fn test_forward_walk_enumerates_every_record_exactly_once() {
    let engine = engine_over(rows_a_to_f());
    let order = name_asc();
    let filter = RowFilter::default();

    let mut seen = Vec::new();
    let mut after = None;
    loop {
        let page = engine
            .resolve_page(&filter, &order, &PageRequest::forward(4, after.clone()))
            .await
            .unwrap();
        seen.extend(ids(&page));
        if !page.info.has_next {
            break;
        }
        after = page.info.end_cursor.clone();
    }

    // In sort order, no duplicates, no gaps.
    assert_eq!(seen, [1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_single_record_window_boundary() {
    let engine = engine_over(vec![Row::new(1, "only")]);
    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &PageRequest::forward(1, None))
        .await
        .unwrap();

    assert_eq!(ids(&page), [1]);
    assert!(!page.info.has_next);
    assert!(!page.info.has_previous);
    assert!(page.info.start_cursor.is_some());
    assert_eq!(page.info.start_cursor, page.info.end_cursor);
}

#[tokio::test]
async fn test_backward_walk_reconstructs_first_window() {
    let engine = engine_over(rows_a_to_f());
    let order = name_asc();
    let filter = RowFilter::default();

    // Walk forward to the final window.
    let mut after = None;
    let mut forward_pages = Vec::new();
    loop {
        let page = engine
            .resolve_page(&filter, &order, &PageRequest::forward(2, after.clone()))
            .await
            .unwrap();
        after = page.info.end_cursor.clone();
        let done = !page.info.has_next;
        forward_pages.push(page);
        if done {
            break;
        }
    }
    assert_eq!(forward_pages.len(), 3);

    // Walk backward from the final boundary.
    let mut before = forward_pages.last().unwrap().info.start_cursor.clone();
    let mut window_ids = Vec::new();
    let mut has_previous = true;
    while has_previous {
        let prev = engine
            .resolve_page(&filter, &order, &PageRequest::backward(2, before.clone()))
            .await
            .unwrap();
        before = prev.info.start_cursor.clone();
        has_previous = prev.info.has_previous;
        window_ids = ids(&prev);
    }

    assert_eq!(window_ids, ids(&forward_pages[0]));
}

#[tokio::test]
async fn test_backward_window_presented_in_ascending_order() {
    let engine = engine_over(rows_a_to_f());
    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &PageRequest::backward(2, None))
        .await
        .unwrap();

    // Last two records, ascending presentation order.
    assert_eq!(ids(&page), [5, 6]);
    assert!(page.info.has_previous);
    assert!(!page.info.has_next);
}

#[tokio::test]
async fn test_anchored_backward_page_sets_has_next() {
    let engine = engine_over(rows_a_to_f());
    let order = name_asc();
    let filter = RowFilter::default();

    let tail = engine
        .resolve_page(&filter, &order, &PageRequest::backward(2, None))
        .await
        .unwrap();
    let prev = engine
        .resolve_page(
            &filter,
            &order,
            &PageRequest::backward(2, tail.info.start_cursor.clone()),
        )
        .await
        .unwrap();

    assert_eq!(ids(&prev), [3, 4]);
    assert!(prev.info.has_next);
    assert!(prev.info.has_previous);
}

#[tokio::test]
async fn test_total_count_is_stable_across_pages() {
    let engine = engine_over(rows_a_to_f());
    let order = name_asc();
    let filter = RowFilter {
        name_contains: Some("o".to_string()),
    };

    let p1 = engine
        .resolve_page(&filter, &order, &PageRequest::forward(1, None))
        .await
        .unwrap();
    let p2 = engine
        .resolve_page(
            &filter,
            &order,
            &PageRequest::forward(1, p1.info.end_cursor.clone()),
        )
        .await
        .unwrap();

    assert_eq!(p1.info.total_count, p2.info.total_count);
    assert!(p1.info.total_count > 0);
}

#[tokio::test]
async fn test_invalid_cursor_degrades_to_first_page() {
    let engine = engine_over(rows_a_to_f());
    let page = engine
        .resolve_page(
            &RowFilter::default(),
            &name_asc(),
            &PageRequest::forward(2, Some("not-a-cursor!!!".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(ids(&page), [1, 2]);
    // A discarded anchor is equivalent to no anchor.
    assert!(!page.info.has_previous);
}

#[tokio::test]
async fn test_cursor_from_different_order_is_ignored() {
    let engine = engine_over(rows_a_to_f());
    let name_cursor = encode_cursor(&Cursor {
        id: 3,
        order_fields: vec!["name".to_string()],
        order_values: vec![SortValue::Text("charlie".to_string())],
        direction: SortDirection::Asc,
    });

    let page = engine
        .resolve_page(
            &RowFilter::default(),
            &OrderSpec::new("population", SortDirection::Asc),
            &PageRequest::forward(2, Some(name_cursor)),
        )
        .await
        .unwrap();

    assert!(!page.info.has_previous);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_first_takes_precedence_over_last() {
    let engine = engine_over(rows_a_to_f());
    let window = PageRequest {
        first: Some(2),
        last: Some(5),
        ..PageRequest::default()
    };
    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &window)
        .await
        .unwrap();

    assert_eq!(ids(&page), [1, 2]);
}

#[tokio::test]
async fn test_default_window_size() {
    let rows: Vec<Row> = (1..=25)
        .map(|i| Row::new(i, &format!("row{i:03}")))
        .collect();
    let engine = engine_over(rows);

    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE as usize);
    assert!(page.info.has_next);
}

#[tokio::test]
async fn test_null_primary_anchor_falls_back_to_id_ordering() {
    let rows = vec![
        Row::new(1, "a"),
        Row::new(2, "b"),
        Row::with_population(3, "c", 10),
        Row::with_population(4, "d", 5),
    ];
    let engine = engine_over(rows);
    let order = OrderSpec::new("population", SortDirection::Asc);
    let filter = RowFilter::default();

    // Nulls sort first: window is the two population-less rows.
    let p1 = engine
        .resolve_page(&filter, &order, &PageRequest::forward(2, None))
        .await
        .unwrap();
    assert_eq!(ids(&p1), [1, 2]);

    // The anchor's population is null, so the resume comparison uses the id
    // alone; the remaining rows come back in population order.
    let p2 = engine
        .resolve_page(&filter, &order, &PageRequest::forward(2, p1.info.end_cursor))
        .await
        .unwrap();
    assert_eq!(ids(&p2), [4, 3]);
    assert!(!p2.info.has_next);
}

#[tokio::test]
async fn test_descending_walk() {
    let engine = engine_over(rows_a_to_f());
    let order = OrderSpec::new("name", SortDirection::Desc);
    let filter = RowFilter::default();

    let p1 = engine
        .resolve_page(&filter, &order, &PageRequest::forward(2, None))
        .await
        .unwrap();
    assert_eq!(ids(&p1), [6, 5]);

    let p2 = engine
        .resolve_page(&filter, &order, &PageRequest::forward(2, p1.info.end_cursor))
        .await
        .unwrap();
    assert_eq!(ids(&p2), [4, 3]);
}

#[tokio::test]
async fn test_empty_result_set_has_no_cursors() {
    let engine = engine_over(Vec::new());
    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &PageRequest::forward(5, None))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert!(page.info.start_cursor.is_none());
    assert!(page.info.end_cursor.is_none());
    assert!(!page.info.has_next);
    assert!(!page.info.has_previous);
    assert_eq!(page.info.total_count, 0);
}

#[tokio::test]
async fn test_boundary_cursor_round_trips_through_codec() {
    let engine = engine_over(rows_a_to_f());
    let page = engine
        .resolve_page(&RowFilter::default(), &name_asc(), &PageRequest::forward(3, None))
        .await
        .unwrap();

    let cursor = decode_cursor(page.info.end_cursor.as_deref().unwrap()).unwrap();
    assert_eq!(cursor.id, 3);
    assert_eq!(cursor.order_fields, ["name"]);
    assert_eq!(
        cursor.order_values,
        [SortValue::Text("charlie".to_string())]
    );
}
