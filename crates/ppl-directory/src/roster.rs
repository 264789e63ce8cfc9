//! Built-in demo roster used when no directory file is configured.

use ppl_core::Person;

// (id, name, email, alias)
type Row = (&'static str, &'static str, &'static str, Option<&'static str>);

const ROSTER: &[Row] = &[
    ("u-001", "Ada Lovelace", "ada.lovelace@example.com", Some("ada")),
    ("u-002", "Alan Turing", "alan.turing@example.com", Some("aturing")),
    ("u-003", "Alice Johnson", "alice.johnson@example.com", None),
    ("u-004", "Barbara Liskov", "barbara.liskov@example.com", Some("bliskov")),
    ("u-005", "Claude Shannon", "claude.shannon@example.com", None),
    ("u-006", "Dennis Ritchie", "dennis.ritchie@example.com", Some("dmr")),
    ("u-007", "Donald Knuth", "donald.knuth@example.com", Some("dek")),
    ("u-008", "Edsger Dijkstra", "edsger.dijkstra@example.com", Some("ewd")),
    ("u-009", "Frances Allen", "frances.allen@example.com", Some("fran")),
    ("u-010", "Grace Hopper", "grace.hopper@example.com", Some("amazing_grace")),
    ("u-011", "John Backus", "john.backus@example.com", None),
    ("u-012", "John McCarthy", "john.mccarthy@example.com", Some("jmc")),
    ("u-013", "Joan Clarke", "joan.clarke@example.com", None),
    ("u-014", "Katherine Johnson", "katherine.johnson@example.com", Some("kat")),
    ("u-015", "Ken Thompson", "ken.thompson@example.com", Some("ken")),
    ("u-016", "Leslie Lamport", "leslie.lamport@example.com", Some("lamport")),
    ("u-017", "Margaret Hamilton", "margaret.hamilton@example.com", Some("maggie")),
    ("u-018", "Niklaus Wirth", "niklaus.wirth@example.com", Some("nwirth")),
    ("u-019", "Radia Perlman", "radia.perlman@example.com", None),
    ("u-020", "Tony Hoare", "tony.hoare@example.com", Some("car")),
];

/// Demo people for the bundled binary and for tests.
pub fn demo_roster() -> Vec<Person> {
    ROSTER
        .iter()
        .map(|&(id, name, email, alias)| {
            let person = Person::new(id, name, email);
            match alias {
                Some(a) => person.with_alias(a),
                None => person,
            }
        })
        .collect()
}
