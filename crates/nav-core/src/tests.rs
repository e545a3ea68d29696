//! Unit tests for nav-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EntityId, GroupId, LayerId, Node};

    #[test]
    fn index_roundtrip() {
        let id = EntityId(42);
        assert_eq!(id.index(), 42);
        assert!(id.is_valid());
        assert!(!EntityId::INVALID.is_valid());
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(Node::INVALID.0, u32::MAX);
        assert_eq!(EntityId::INVALID.0, u32::MAX);
        assert_eq!(LayerId::INVALID.0, u16::MAX);
    }

    #[test]
    fn layers_stack_downwards() {
        assert_eq!(LayerId::SURFACE.below(), LayerId(1));
        assert_eq!(LayerId(1).above(), Some(LayerId::SURFACE));
        assert_eq!(LayerId::SURFACE.above(), None);
    }

    #[test]
    fn group_sentinels_are_distinct() {
        assert_ne!(GroupId::WALL, GroupId::NONE);
        assert!(GroupId::WALL.is_wall());
        assert!(!GroupId(3).is_wall());
    }

    #[test]
    fn display() {
        assert_eq!(Node(7).to_string(), "7");
        assert_eq!(LayerId(2).to_string(), "2");
        assert_eq!(GroupId(2).to_string(), "2");
        assert_eq!(GroupId::WALL.to_string(), "wall");
    }
}

#[cfg(test)]
mod geo {
    use crate::WorldPos;

    #[test]
    fn distance_is_euclidean() {
        let a = WorldPos::new(0.0, 0.0);
        let b = WorldPos::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }

    #[test]
    fn box_check() {
        let center = WorldPos::new(10.0, 10.0);
        assert!(WorldPos::new(12.0, 8.0).within_box(center, 2.0));
        assert!(!WorldPos::new(13.0, 10.0).within_box(center, 2.0));
    }
}

#[cfg(test)]
mod config {
    use crate::{NavConfig, SearchConfig};

    #[test]
    fn default_validates() {
        assert!(NavConfig::default().validate().is_ok());
    }

    #[test]
    fn default_tile_is_64_units() {
        assert_eq!(NavConfig::default().grid.tile_size(), 64.0);
    }

    #[test]
    fn budget_formula() {
        let s = SearchConfig::default();
        assert_eq!(s.default_budget(0.0), 40);
        // ⌊12.72 × 4⌋ + 40
        assert_eq!(s.default_budget(9.0 * std::f32::consts::SQRT_2), 90);
    }

    #[test]
    fn rejects_zero_separation() {
        let mut cfg = NavConfig::default();
        cfg.grid.node_separation = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_resolution() {
        let mut cfg = NavConfig::default();
        cfg.grid.sample_resolution = 0;
        assert!(cfg.validate().is_err());
    }
}
