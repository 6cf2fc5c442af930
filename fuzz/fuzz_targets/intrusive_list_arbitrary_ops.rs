#![no_main]

use libfuzzer_sys::fuzz_target;
use memocache::ds::IntrusiveList;

// Fuzz arbitrary operation sequences on IntrusiveList
//
// Tests random sequences of push_front, pop_back, move_to_front, remove,
// get_mut, drain and clear, checking links after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut all_ids = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let value = u32::from(data[idx + 1]);

        match op {
            0 => {
                // push_front
                let id = list.push_front(value);
                all_ids.push(id);

                assert_eq!(list.front(), Some(&value));
                assert_eq!(list.front_id(), Some(id));
                assert_eq!(list.get(id), Some(&value));
            },
            1 => {
                // pop_back
                let old_len = list.len();
                let old_back = list.back().copied();
                let popped = list.pop_back();

                assert_eq!(popped, old_back);
                if popped.is_some() {
                    assert_eq!(list.len(), old_len - 1);
                } else {
                    assert_eq!(list.len(), 0);
                }
            },
            2 => {
                // move_to_front
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let old_len = list.len();
                    if list.move_to_front(id) {
                        assert_eq!(list.front_id(), Some(id));
                    }
                    assert_eq!(list.len(), old_len);
                }
            },
            3 => {
                // remove
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let old_len = list.len();
                    if list.remove(id).is_some() {
                        assert_eq!(list.len(), old_len - 1);
                        assert!(!list.contains(id));
                    }
                }
            },
            4 => {
                // get_mut
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    if let Some(slot) = list.get_mut(id) {
                        *slot = value;
                        assert_eq!(list.get(id), Some(&value));
                    }
                }
            },
            5 => {
                // iter length matches len
                assert_eq!(list.iter().count(), list.len());
            },
            6 => {
                // drain
                let expected = list.len();
                let drained = list.drain().count();
                all_ids.clear();
                assert_eq!(drained, expected);
                assert!(list.is_empty());
            },
            7 => {
                // clear
                list.clear();
                all_ids.clear();

                assert!(list.is_empty());
                assert_eq!(list.front(), None);
                assert_eq!(list.back(), None);
            },
            _ => unreachable!(),
        }

        assert!(list.check_links().is_ok());
        idx += 2;
    }
});
