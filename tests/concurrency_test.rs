mod helpers;

use helpers::{insert_trait, persons_db, traits_db};
use std::sync::{Arc, Mutex};
use std::thread;
use traits_matcher::personality::analyze::{add_description, Combine};
use traits_matcher::personality::persons::{create_person, get_person};
use traits_matcher::personality::traits::list_traits;
use traits_matcher::personality::types::ScoreVector;

#[test]
fn concurrent_descriptions_lose_no_updates() {
    let persons = persons_db();
    let traits = traits_db();
    insert_trait(&traits, "friendly", 1.0, 2.0);
    create_person(&persons, "A", 100).unwrap();

    let vocab = Arc::new(list_traits(&traits).unwrap());
    let store = Arc::new(Mutex::new(persons));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let vocab = Arc::clone(&vocab);
            thread::spawn(move || {
                for _ in 0..25 {
                    let mut conn = store.lock().unwrap();
                    add_description(&mut conn, "A", "friendly", &vocab, Combine::Sum, 1000)
                        .unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let conn = store.lock().unwrap();
    let p = get_person(&conn, "A").unwrap();
    assert_eq!(p.score(), ScoreVector::new(200.0, 400.0));
    assert_eq!(p.observations, 200);
}
