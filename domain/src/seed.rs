//! Startup data. The registry is re-seeded on every launch.

use crate::{House, Service};

pub const DEFAULT_COMMUNITY_NAME: &str = "Green Valley Residency";

/// The houses every launch starts with.
pub fn houses() -> Vec<House> {
    [(1, "Ravi", "Anita"), (2, "John", "Alice"), (3, "Hemanth", "Jon Snow")]
        .into_iter()
        .map(|(id, owner, resident)| {
            let mut h = House::new(id, owner);
            h.add_resident(resident);
            h
        })
        .collect()
}

/// The services every launch starts with.
pub fn services() -> Vec<Service> {
    vec![
        Service::new(1, "Plumbing", Some("Mr. Kumar".into()), 500),
        Service::new(2, "Grocery Delivery", Some("FreshMart".into()), 200),
        Service::new(3, "Electrician", Some("PowerFix".into()), 700),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique() {
        let mut ids: Vec<u32> = houses().iter().map(|h| h.id).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3]);
        let mut ids: Vec<u32> = services().iter().map(|s| s.id).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn every_seeded_house_has_a_resident() {
        assert!(houses().iter().all(|h| h.residents.len() == 1));
    }
}
