use newtitles_core::{page_count, paginate, PageCursor};

#[test]
fn twenty_five_items_split_into_three_pages() {
    let items = (1..=25).collect::<Vec<u32>>();

    assert_eq!(paginate(&items, 1, 10), (1..=10).collect::<Vec<_>>().as_slice());
    assert_eq!(paginate(&items, 3, 10), &[21, 22, 23, 24, 25]);
    assert!(paginate(&items, 4, 10).is_empty());
    assert_eq!(page_count(items.len(), 10), 3);
}

#[test]
fn pages_never_exceed_size_and_reconstruct_items() {
    for count in [0_usize, 1, 9, 10, 11, 37] {
        for size in [1_usize, 3, 10] {
            let items = (0..count).collect::<Vec<_>>();
            let pages = page_count(count, size);
            let mut rebuilt = Vec::new();
            for page in 1..=pages {
                let slice = paginate(&items, page, size);
                assert!(slice.len() <= size);
                rebuilt.extend_from_slice(slice);
            }
            assert_eq!(rebuilt, items, "count={count} size={size}");
        }
    }
}

#[test]
fn empty_listing_still_has_one_page() {
    let items: Vec<u32> = Vec::new();
    assert_eq!(page_count(0, 10), 1);
    assert!(paginate(&items, 1, 10).is_empty());
}

#[test]
fn cursor_slices_current_page() {
    let items = (0..25).collect::<Vec<u32>>();
    let mut cursor = PageCursor::new(10);
    cursor.go_to(3, items.len());
    assert_eq!(cursor.slice(&items), &[20, 21, 22, 23, 24]);
}
