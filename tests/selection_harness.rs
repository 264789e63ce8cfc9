#![allow(unused)]
//! Selection invariants under arbitrary interaction sequences.
//!
//! # What this covers
//!
//! - **Uniqueness**: after any mix of select, pick, remove and search, no
//!   email is selected twice.
//! - **Disjointness**: no visible result is ever selected.
//! - **Order**: the selection keeps first-seen order; removal never
//!   reorders the rest.
//! - **Notification count**: the listener fires once per effective
//!   mutation and never for no-op removals or duplicate picks.
//!
//! # Running
//!
//! ```sh
//! cargo test --test selection_harness
//! ```

mod common;
use common::*;
use ppl_core::{Person, PickerController, Selection};
use proptest::prelude::*;
use std::{sync::Arc, time::Duration};

/// Six people over five emails: index 5 shares an email with index 0.
fn pool() -> Vec<Person> {
    vec![
        PersonBuilder::new("Ada Lovelace").email("ada@x.com").build(),
        PersonBuilder::new("Alan Turing").email("alan@x.com").build(),
        PersonBuilder::new("Alonzo Church").email("alonzo@x.com").build(),
        PersonBuilder::new("Grace Hopper").email("grace@x.com").build(),
        PersonBuilder::new("Barbara Liskov").email("barbara@x.com").build(),
        PersonBuilder::new("Ada Again").email("ada@x.com").build(),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Select(Vec<usize>),
    Pick(usize),
    Remove(usize),
    Search(&'static str),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(0..6usize, 0..8).prop_map(Op::Select),
        (0..6usize).prop_map(Op::Pick),
        (0..6usize).prop_map(Op::Remove),
        prop::sample::select(vec!["a", "al", "ada", "r", ""]).prop_map(Op::Search),
    ]
}

fn emails(people: &[Person]) -> Vec<String> {
    people.iter().map(|p| p.email.clone()).collect()
}

proptest! {
    #[test]
    fn selection_stays_unique_and_results_disjoint(ops in prop::collection::vec(op(), 1..24)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();
        let _guard = rt.enter();

        let people = pool();
        let log = ListenerLog::default();
        let mut picker = log
            .attach(PickerController::builder())
            .debounce_delay(Duration::ZERO)
            .min_search_length(1)
            .shared_search(Arc::new(FakeSearch::new(people.clone())))
            .build();
        let mut expected_notifications = 0;

        for op in ops {
            match op {
                Op::Select(idx) => {
                    picker.select(idx.into_iter().map(|i| people[i].clone()).collect());
                    expected_notifications += 1;
                }
                Op::Pick(i) => {
                    if picker.pick(people[i].clone()) {
                        expected_notifications += 1;
                    }
                }
                Op::Remove(i) => {
                    let before = picker.selection().len();
                    let removed = picker.remove(&people[i].email);
                    prop_assert_eq!(removed, picker.selection().len() + 1 == before);
                    if removed {
                        expected_notifications += 1;
                    }
                }
                Op::Search(q) => {
                    picker.set_query(q);
                    rt.block_on(picker.run_until_idle());
                }
            }

            let selected = emails(picker.selection().as_slice());
            let mut unique = selected.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), selected.len(), "duplicate in {:?}", selected);

            for p in picker.results() {
                prop_assert!(!picker.selection().contains_email(&p.email), "{} is selected and shown", p.email);
            }
        }

        prop_assert_eq!(log.count(), expected_notifications);
    }

    #[test]
    fn remove_keeps_relative_order(idx in prop::collection::vec(0..6usize, 1..10), drop in 0..6usize) {
        let people = pool();
        let mut sel = Selection::from_people(idx.iter().map(|&i| people[i].clone()));
        let before: Vec<String> = emails(sel.as_slice())
            .into_iter()
            .filter(|e| *e != people[drop].email)
            .collect();
        sel.remove(&people[drop].email);
        prop_assert_eq!(emails(sel.as_slice()), before);
    }
}

#[test]
fn first_occurrence_wins_on_duplicate_email() {
    let people = pool();
    let sel = Selection::from_people(vec![people[5].clone(), people[1].clone(), people[0].clone()]);
    assert_emails!(sel, ["ada@x.com", "alan@x.com"]);
    assert_eq!(sel.as_slice()[0].name, "Ada Again");
}
