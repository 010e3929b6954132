use bookrank::{rank, Weight, WeightedList};
use bookrank::TaggedEntity;
use proptest::prelude::*;

struct Tagged(WeightedList<String>);

impl TaggedEntity for Tagged {
    fn key(&self) -> &str { "tagged" }
    fn tags(&self) -> &WeightedList<String> { &self.0 }
}

fn is_descending(list: &WeightedList<u16>) -> bool {
    let ws: Vec<Weight> = list.entries().map(|(_, w)| w).collect();
    ws.windows(2).all(|w| w[0] >= w[1])
}

fn tag_list() -> impl Strategy<Value = Vec<(String, Weight)>> {
    prop::collection::vec(("[a-e]{1,2}", 0i64..50), 0..12)
}

fn tagged(pairs: &[(String, Weight)]) -> Tagged {
    let mut list = WeightedList::new();
    for (t, w) in pairs {
        list.add_with_weight(t.clone(), *w);
    }
    Tagged(list)
}

proptest! {
    #[test]
    fn stays_sorted_after_every_insert(pairs in prop::collection::vec((0u16..40, -100i64..100), 0..200)) {
        let mut list = WeightedList::new();
        for (v, w) in pairs {
            list.add_with_weight(v, w);
            prop_assert!(is_descending(&list));
        }
    }

    #[test]
    fn add_never_duplicates(values in prop::collection::vec(0u16..20, 0..100)) {
        let mut list = WeightedList::new();
        for v in &values {
            list.add(*v);
            prop_assert!(is_descending(&list));
        }
        let mut distinct = values.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(list.len(), distinct.len());
        for v in distinct {
            let count = values.iter().filter(|x| **x == v).count() as Weight;
            prop_assert_eq!(list.weight_of(&v), Some(count - 1));
        }
    }

    #[test]
    fn bulk_add_matches_repeated_add(values in prop::collection::vec(0u16..20, 0..100)) {
        let bulk: WeightedList<u16> = values.iter().copied().collect();
        let mut single = WeightedList::new();
        for v in &values {
            single.add(*v);
        }
        prop_assert!(is_descending(&bulk));
        prop_assert_eq!(bulk.len(), single.len());
        for v in &values {
            prop_assert_eq!(bulk.weight_of(v), single.weight_of(v));
        }
    }

    #[test]
    fn rank_is_symmetric(a in tag_list(), b in tag_list()) {
        let (a, b) = (tagged(&a), tagged(&b));
        prop_assert_eq!(rank(&a, &b), rank(&b, &a));
    }

    #[test]
    fn self_rank_is_sum_of_squares(a in tag_list()) {
        let a = tagged(&a);
        let squares: Weight = a.tags().entries().map(|(_, w)| w * w).sum();
        prop_assert_eq!(rank(&a, &a), squares);
    }
}
