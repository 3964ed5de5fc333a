use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wabi_list::oslist::{self, Cursor};
use wabi_list::store::{Arena, Handle, Node, NodeStore};
use wabi_list::{CapacityError, InsertError, OSList, OutOfRange, Position};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn to_vec<T: Clone>(list: &OSList<T>) -> Vec<T> {
    list.iter().cloned().collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum ListOp {
    PushBack(i64),
    PushFront(i64),
    PopBack,
    PopFront,
    Insert(usize, i64),
    InsertN(usize, usize, i64),
    Erase(usize),
    EraseRange(usize, usize),
    Get(usize),
    Set(usize, i64),
    Front,
    Back,
}

fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        4 => any::<i64>().prop_map(ListOp::PushBack),
        3 => any::<i64>().prop_map(ListOp::PushFront),
        2 => Just(ListOp::PopBack),
        2 => Just(ListOp::PopFront),
        6 => (any::<usize>(), any::<i64>()).prop_map(|(at, v)| ListOp::Insert(at, v)),
        1 => (any::<usize>(), 0usize..8, any::<i64>()).prop_map(|(at, n, v)| ListOp::InsertN(at, n, v)),
        4 => any::<usize>().prop_map(ListOp::Erase),
        1 => (any::<usize>(), 0usize..8).prop_map(|(at, n)| ListOp::EraseRange(at, n)),
        3 => any::<usize>().prop_map(ListOp::Get),
        2 => (any::<usize>(), any::<i64>()).prop_map(|(at, v)| ListOp::Set(at, v)),
        1 => Just(ListOp::Front),
        1 => Just(ListOp::Back),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both OSList and Vec and
    /// asserts identical results at every step.
    #[test]
    fn list_ops_match_vec(ops in proptest::collection::vec(list_op_strategy(), TEST_SIZE)) {
        let mut list: OSList<i64> = OSList::new();
        let mut model: Vec<i64> = Vec::new();

        for op in ops {
            match op {
                ListOp::PushBack(v) => {
                    list.push_back(v);
                    model.push(v);
                }
                ListOp::PushFront(v) => {
                    list.push_front(v);
                    model.insert(0, v);
                }
                ListOp::PopBack => prop_assert_eq!(list.pop_back(), model.pop()),
                ListOp::PopFront => {
                    let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                    prop_assert_eq!(list.pop_front(), expected);
                }
                ListOp::Insert(at, v) => {
                    let index = at % (model.len() + 1);
                    let pos = list.position_at(index).unwrap();
                    let inserted = list.insert(pos, v);
                    prop_assert_eq!(list.index_of(inserted), index);
                    prop_assert_eq!(list.index_of(pos), index + 1);
                    model.insert(index, v);
                }
                ListOp::InsertN(at, n, v) => {
                    let index = at % (model.len() + 1);
                    let pos = list.position_at(index).unwrap();
                    let first = list.insert_n(pos, n, v);
                    prop_assert_eq!(list.index_of(first), index);
                    for _ in 0..n {
                        model.insert(index, v);
                    }
                }
                ListOp::Erase(at) => {
                    if model.is_empty() {
                        continue;
                    }
                    let index = at % model.len();
                    let pos = list.position_at(index).unwrap();
                    let next = list.erase(pos);
                    prop_assert_eq!(list.index_of(next), index);
                    model.remove(index);
                }
                ListOp::EraseRange(at, n) => {
                    let start = at % (model.len() + 1);
                    let end = (start + n).min(model.len());
                    let first = list.position_at(start).unwrap();
                    let last = list.position_at(end).unwrap();
                    prop_assert_eq!(list.erase_range(first, last), last);
                    model.drain(start..end);
                }
                ListOp::Get(at) => {
                    prop_assert_eq!(list.get(at), model.get(at));
                    if !model.is_empty() {
                        let index = at % model.len();
                        prop_assert_eq!(list[index], model[index]);
                    }
                }
                ListOp::Set(at, v) => {
                    if model.is_empty() {
                        prop_assert!(list.at_mut(at).is_err());
                        continue;
                    }
                    let index = at % model.len();
                    *list.at_mut(index).unwrap() = v;
                    model[index] = v;
                }
                ListOp::Front => prop_assert_eq!(list.front(), model.first()),
                ListOp::Back => prop_assert_eq!(list.back(), model.last()),
            }

            prop_assert_eq!(list.len(), model.len());
        }

        prop_assert_eq!(to_vec(&list), model.clone());
        prop_assert!(list.iter().rev().eq(model.iter().rev()));
    }

    #[test]
    fn iter_size_and_double_ended(values in proptest::collection::vec(any::<i32>(), 1..TEST_SIZE), take_front in 0usize..64) {
        let list: OSList<i32> = values.iter().copied().collect();
        let mut iter = list.iter();
        let mut expected = values.iter();

        for _ in 0..take_front.min(values.len()) {
            prop_assert_eq!(iter.next(), expected.next());
        }
        prop_assert_eq!(iter.len(), expected.len());
        prop_assert!(iter.rev().eq(expected.rev()));
    }

    #[test]
    fn into_iter_matches_vec(values in proptest::collection::vec(any::<i32>(), 0..TEST_SIZE)) {
        let list: OSList<i32> = values.iter().copied().collect();
        let back: Vec<i32> = list.clone().into_iter().rev().collect();
        let forward: Vec<i32> = list.into_iter().collect();
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(forward, values);
        prop_assert_eq!(back, reversed);
    }

    #[test]
    fn positions_survive_unrelated_edits(values in proptest::collection::vec(any::<i32>(), 1..500), edits in proptest::collection::vec((any::<bool>(), any::<usize>()), 0..200)) {
        let mut list: OSList<i32> = values.iter().copied().collect();
        let watched = list.begin();
        let watched_value = values[0];

        for (insert, at) in edits {
            let len = list.len();
            if insert {
                let pos = list.position_at(at % (len + 1)).unwrap();
                list.insert(pos, -1);
            } else if len > 1 {
                // Never erase the watched element.
                let index = at % len;
                let pos = list.position_at(index).unwrap();
                if pos != watched {
                    list.erase(pos);
                }
            }
            prop_assert_eq!(list.value_at(watched), Some(&watched_value));
            let index = list.index_of(watched);
            prop_assert_eq!(list.position_at(index).unwrap(), watched);
        }
    }

    #[test]
    fn cursor_arithmetic(
        len in 1usize..1000,
        from in any::<usize>(),
        offset in prop_oneof![4 => -1200isize..1200, 1 => any::<isize>()],
    ) {
        let list: OSList<usize> = (0..len).collect();
        let from = from % (len + 1);
        let cursor = list.cursor_at(from).unwrap();

        let mut moved = cursor;
        let target = (from as isize).checked_add(offset).unwrap_or(isize::MIN);
        if (0..=len as isize).contains(&target) {
            moved.advance(offset).unwrap();
            prop_assert_eq!(moved.index(), target as usize);
            prop_assert_eq!((cursor + offset) - offset, cursor);
            prop_assert_eq!((cursor + offset) - cursor, offset);
        } else {
            prop_assert_eq!(moved.advance(offset), Err(OutOfRange::Offset { offset, len }));
            prop_assert_eq!(moved, cursor);
        }
    }

    #[test]
    fn resize_matches_vec(initial in 0usize..300, new_len in 0usize..300) {
        let mut list: OSList<usize> = (0..initial).collect();
        let mut model: Vec<usize> = (0..initial).collect();
        list.resize(new_len, 7);
        model.resize(new_len, 7);
        prop_assert_eq!(to_vec(&list), model);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn push_back_five_and_read_the_third() {
    let mut list = OSList::new();
    for value in 1..=5 {
        list.push_back(value);
    }
    assert_eq!(list.len(), 5);
    assert_eq!(list.at(2), Ok(&3));
}

#[test]
fn erase_the_middle_then_insert_at_the_front() {
    let mut list = OSList::from([1, 2, 3, 4, 5]);
    let three = list.position_at(2).unwrap();
    list.erase(three);
    assert_eq!(to_vec(&list), [1, 2, 4, 5]);

    let begin = list.begin();
    list.insert(begin, 10);
    assert_eq!(to_vec(&list), [10, 1, 2, 4, 5]);
}

#[test]
fn pop_front_until_empty() {
    let mut list = OSList::from([1, 2, 3, 4, 5]);
    for expected in 1..=5 {
        assert_eq!(list.pop_front(), Some(expected));
    }
    assert!(list.is_empty());
    assert_eq!(list.pop_front(), None);
    assert!(list.is_empty());
}

#[test]
fn range_with_a_failing_element_leaves_the_list_unchanged() {
    let mut list = OSList::from([1, 2, 3]);
    let anchor = list.position_at(1).unwrap();
    let source = vec![Ok(10), Ok(20), Err("element 3"), Ok(40), Ok(50)];

    let result = list.try_insert_range(anchor, source);

    assert_eq!(result, Err(InsertError::Element("element 3")));
    assert_eq!(to_vec(&list), [1, 2, 3]);
    assert_eq!(list.index_of(anchor), 1);
}

#[test]
fn random_inserts_keep_lookups_fast() {
    let mut rng = StdRng::seed_from_u64(1000);
    let mut list = OSList::new();
    let mut model = Vec::new();

    for value in 0..1000 {
        let index = rng.gen_range(0..=model.len());
        let pos = list.position_at(index).unwrap();
        list.insert(pos, value);
        model.insert(index, value);
    }

    assert_eq!(to_vec(&list), model);
    for (index, value) in model.iter().enumerate() {
        assert_eq!(list.get(index), Some(value));
    }
}

// ─── Failure atomicity ───────────────────────────────────────────────────────

#[test]
fn panicking_source_rolls_back() {
    let mut list = OSList::from([1, 2, 3]);
    let anchor = list.position_at(2).unwrap();
    let source = (10..20).map(|value| {
        assert!(value < 13, "source exhausted");
        value
    });

    let result = catch_unwind(AssertUnwindSafe(|| list.insert_range(anchor, source)));

    assert!(result.is_err());
    assert_eq!(to_vec(&list), [1, 2, 3]);
    assert_eq!(list.value_at(anchor), Some(&3));
}

#[test]
fn panicking_clone_rolls_back_insert_n() {
    struct Fragile(Rc<()>, usize);

    impl Clone for Fragile {
        fn clone(&self) -> Self {
            assert!(Rc::strong_count(&self.0) < 6, "clone failed");
            Fragile(Rc::clone(&self.0), self.1)
        }
    }

    let token = Rc::new(());
    let mut list = OSList::new();
    list.push_back(Fragile(Rc::clone(&token), 0));
    list.push_back(Fragile(Rc::clone(&token), 1));

    let seed = Fragile(Rc::clone(&token), 99);
    let result = catch_unwind(AssertUnwindSafe(|| list.insert_n(list.end(), 10, seed)));

    assert!(result.is_err());
    assert_eq!(list.len(), 2);
    assert_eq!(list.iter().map(|f| f.1).collect::<Vec<_>>(), [0, 1]);
    // Only the two surviving elements and `token` itself remain.
    assert_eq!(Rc::strong_count(&token), 3);
}

#[test]
fn full_store_rolls_back_and_reports_capacity() {
    let mut list = OSList::with_store(Arena::with_limit(6));
    list.insert_range(Position::END, [1, 2, 3, 4]);
    let anchor = list.position_at(2).unwrap();

    let result = list.try_insert_range(anchor, (0..5).map(Ok::<i32, ()>));

    assert_eq!(result, Err(InsertError::Capacity(CapacityError { capacity: 6 })));
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
    assert_eq!(list.store().len(), 4);
    assert_eq!(list.try_push_back(5), Ok(()));
    assert_eq!(list.try_push_front(0), Ok(()));
    assert_eq!(list.try_push_back(6), Err(CapacityError { capacity: 6 }));
}

#[test]
fn every_value_is_dropped_exactly_once() {
    let token = Rc::new(());
    {
        let mut list: OSList<Rc<()>> = std::iter::repeat_with(|| Rc::clone(&token)).take(100).collect();
        assert_eq!(Rc::strong_count(&token), 101);

        for _ in 0..10 {
            list.pop_back();
            list.remove(20);
        }
        let first = list.position_at(5).unwrap();
        let last = list.position_at(25).unwrap();
        list.erase_range(first, last);
        assert_eq!(Rc::strong_count(&token), 61);

        let mut iter = list.clone().into_iter();
        iter.next();
        iter.next_back();
        drop(iter);
        assert_eq!(Rc::strong_count(&token), 61);

        list.clear();
        assert_eq!(Rc::strong_count(&token), 1);
        list.push_back(Rc::clone(&token));
    }
    assert_eq!(Rc::strong_count(&token), 1);
}

// ─── Trait surface ───────────────────────────────────────────────────────────

#[test]
fn swap_exchanges_contents_and_positions() {
    let mut a = OSList::from([1, 2, 3]);
    let mut b = OSList::from([9]);
    let two = a.position_at(1).unwrap();

    a.swap(&mut b);

    assert_eq!(to_vec(&a), [9]);
    assert_eq!(to_vec(&b), [1, 2, 3]);
    assert_eq!(b.value_at(two), Some(&2));
}

#[test]
fn clones_are_independent() {
    let original = OSList::from([1, 2, 3]);
    let mut copy = original.clone();
    copy.push_back(4);
    *copy.front_mut().unwrap() = 0;

    assert_eq!(to_vec(&original), [1, 2, 3]);
    assert_eq!(to_vec(&copy), [0, 2, 3, 4]);
}

#[test]
fn equal_lists_hash_equally() {
    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    let a: OSList<i32> = (0..50).collect();
    let mut b = OSList::new();
    for value in (0..50).rev() {
        b.push_front(value);
    }
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(hash_of(&OSList::from([1])), hash_of(&OSList::from([1, 1])));
}

#[test]
fn default_and_from_iter() {
    let empty: OSList<String> = OSList::default();
    assert!(empty.is_empty());

    let words: OSList<String> = "the quick brown fox".split(' ').map(String::from).collect();
    assert_eq!(words.len(), 4);
    assert_eq!(words[3], "fox");
    assert_eq!(format!("{words:?}"), r#"["the", "quick", "brown", "fox"]"#);
}

#[test]
fn reverse_traversal() {
    let list: OSList<char> = "abcde".chars().collect();
    let reversed: String = list.iter().rev().collect();
    assert_eq!(reversed, "edcba");

    let mut cursor = list.cursor_back();
    let mut seen = String::new();
    while let Some(c) = cursor.current() {
        seen.push(*c);
        cursor.move_prev();
    }
    assert_eq!(seen, "edcba");
}

#[test]
fn iter_mut_via_into_iterator() {
    let mut list: OSList<i32> = (1..=4).collect();
    for value in &mut list {
        *value *= *value;
    }
    let total: i32 = (&list).into_iter().sum();
    assert_eq!(total, 1 + 4 + 9 + 16);
}

#[test]
fn iter_mut_references_live_together() {
    let mut list: OSList<u32> = (0..64).collect();
    let mut refs: Vec<&mut u32> = list.iter_mut().collect();
    for (i, value) in refs.iter_mut().enumerate() {
        **value += i as u32;
    }
    *refs[0] = 1000;
    assert!(list.iter().copied().eq((0..64).map(|v| if v == 0 { 1000 } else { 2 * v })));

    let mut iter = list.iter_mut();
    let front = iter.next().unwrap();
    let back = iter.next_back().unwrap();
    let middle: Vec<&mut u32> = iter.collect();
    *front = 1;
    *back = 2;
    for value in middle {
        *value = 0;
    }
    assert_eq!(list.front(), Some(&1));
    assert_eq!(list.back(), Some(&2));
    assert_eq!(list.iter().sum::<u32>(), 3);
}

#[test]
fn cursor_moves_near_isize_limits_fail_cleanly() {
    let list: OSList<i32> = (0..10).collect();
    for from in 0..=10 {
        let start = list.cursor_at(from).unwrap();
        for offset in [isize::MAX, isize::MIN] {
            let mut cursor = start;
            assert_eq!(cursor.advance(offset), Err(OutOfRange::Offset { offset, len: 10 }));
            assert_eq!(cursor, start);
            assert_eq!(start.peek(offset), None);
        }
    }
    assert_eq!(list.cursor_at(9).unwrap().peek(isize::MAX), None);

    let mut copy = list.clone();
    let mut cursor = copy.cursor_at_mut(5).unwrap();
    assert_eq!(cursor.advance(isize::MAX), Err(OutOfRange::Offset { offset: isize::MAX, len: 10 }));
    assert_eq!(cursor.advance(isize::MIN), Err(OutOfRange::Offset { offset: isize::MIN, len: 10 }));
    assert_eq!(cursor.index(), 5);
}

#[test]
#[should_panic(expected = "`Cursor::sub_assign()` - offset -9223372036854775808 moves a cursor outside a list of length 3!")]
fn cursor_sub_reports_the_given_offset() {
    let list = OSList::from([1, 2, 3]);
    let _ = list.cursor_front() - isize::MIN;
}

#[test]
#[should_panic(expected = "`Cursor::add_assign()` - offset 9223372036854775807 moves a cursor outside a list of length 3!")]
fn cursor_add_rejects_isize_max() {
    let list = OSList::from([1, 2, 3]);
    let _ = list.cursor_back() + isize::MAX;
}

#[test]
fn cursor_types_are_exported() {
    let list = OSList::from([1, 2, 3]);
    let cursor: Cursor<'_, i32> = list.cursor_front();
    let iter: oslist::Iter<'_, i32> = list.iter();
    assert_eq!(cursor.current(), iter.clone().next());
    assert_eq!(iter.len(), 3);
}

// ─── Custom storage ──────────────────────────────────────────────────────────

/// An arena wrapper that counts allocations.
struct CountingStore<T> {
    arena: Arena<Node<T>>,
    allocations: usize,
}

impl<T> Default for CountingStore<T> {
    fn default() -> Self {
        CountingStore {
            arena: Arena::new(),
            allocations: 0,
        }
    }
}

// SAFETY: Delegates to the wrapped arena, which upholds the handle contract.
unsafe impl<T> NodeStore<T> for CountingStore<T> {
    fn try_alloc(&mut self, node: Node<T>) -> Result<Handle, CapacityError> {
        self.allocations += 1;
        self.arena.alloc(node)
    }

    fn free(&mut self, handle: Handle) -> Node<T> {
        self.arena.take(handle)
    }

    fn get(&self, handle: Handle) -> &Node<T> {
        self.arena.get(handle)
    }

    fn get_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.arena.get_mut(handle)
    }

    unsafe fn node_ptr(this: *mut Self, handle: Handle) -> *mut Node<T> {
        // SAFETY: Forwarded from the caller; only the `arena` field is touched.
        unsafe { Arena::get_ptr(&raw mut (*this).arena, handle) }
    }

    fn clear(&mut self) {
        self.arena.clear();
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    fn new_like(&self) -> Self {
        CountingStore::default()
    }
}

#[test]
fn custom_store_is_used_for_every_node() {
    let mut list: OSList<u8, CountingStore<u8>> = (0..10).collect();
    list.remove(3);
    list.push_front(42);
    assert_eq!(list.store().allocations, 11);
    assert_eq!(list.store().len(), 10);

    let copy = list.clone();
    assert_eq!(copy.store().allocations, 10);
    assert_eq!(copy, list);

    let values: Vec<&mut u8> = list.iter_mut().collect();
    for value in values {
        *value += 1;
    }
    assert!(list.iter().eq(&[43, 1, 2, 3, 5, 6, 7, 8, 9, 10]));

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.store().len(), 0);
}
