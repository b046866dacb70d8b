use std::collections::HashMap;

use geocache_core::{
    CellData, Command, Event, GeoBounds, GeoPoint, GridCoord, Rules, SpawnOracle, Token,
};
use geocache_system_lifecycle::Lifecycle;
use geocache_system_spawning::Spawning;
use geocache_world::{self as world, query, World};

struct EveryOtherColumn;

impl SpawnOracle for EveryOtherColumn {
    fn luck(&self, seed: &str) -> f64 {
        if seed.ends_with("initialValue") {
            return 0.0;
        }
        let lng: f64 = seed
            .split(',')
            .nth(1)
            .and_then(|value| value.parse().ok())
            .expect("seed carries a longitude");
        if (lng as i64) % 2 == 0 {
            0.0
        } else {
            0.99
        }
    }
}

fn unit_rules() -> Rules {
    Rules {
        tile_degrees: 1.0,
        interact_range: 1.0,
        ..Rules::default()
    }
}

fn bounds(west: f64, south: f64, east: f64, north: f64) -> GeoBounds {
    GeoBounds::new(GeoPoint::new(south, west), GeoPoint::new(north, east))
}

struct Harness<O> {
    world: World,
    lifecycle: Lifecycle<O>,
    memory: HashMap<GridCoord, CellData>,
}

impl<O: SpawnOracle> Harness<O> {
    fn new(lifecycle: Lifecycle<O>) -> Self {
        Self {
            world: World::with_rules(unit_rules()),
            lifecycle,
            memory: HashMap::new(),
        }
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = vec![command];
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            for event in &events {
                if let Event::CellModified { data } = event {
                    let _ = self.memory.insert(data.grid_coord, *data);
                }
            }
            let cells = query::cell_view(&self.world);
            let memory = &self.memory;
            self.lifecycle
                .handle(&events, &cells, |coord| memory.get(&coord).copied(), &mut pending);
            log.extend(events);
        }
        log
    }
}

#[test]
fn viewport_populates_only_oracle_cells() {
    let mut harness = Harness::new(Lifecycle::new(Spawning::with_oracle(
        EveryOtherColumn,
        unit_rules(),
    )));

    let _ = harness.dispatch(Command::SetViewport {
        bounds: bounds(0.0, 0.0, 3.0, 1.0),
    });

    let coords: Vec<GridCoord> = query::cell_view(&harness.world)
        .iter()
        .map(|snapshot| snapshot.data.grid_coord)
        .collect();
    assert_eq!(
        coords,
        vec![
            GridCoord::new(0, 0),
            GridCoord::new(0, 1),
            GridCoord::new(2, 0),
            GridCoord::new(2, 1),
        ]
    );
    assert!(query::cell(&harness.world, GridCoord::new(1, 0)).is_none());
}

#[test]
fn unmodified_cells_regenerate_identically() {
    let mut harness = Harness::new(Lifecycle::new(Spawning::new(unit_rules())));
    let home = bounds(0.0, 0.0, 20.0, 20.0);

    let _ = harness.dispatch(Command::SetViewport { bounds: home });
    let first = query::cell_view(&harness.world).into_vec();
    assert!(!first.is_empty(), "expected some caches in a 21x21 area");

    let _ = harness.dispatch(Command::SetViewport {
        bounds: bounds(500.0, 500.0, 501.0, 501.0),
    });
    for snapshot in &first {
        assert!(query::cell(&harness.world, snapshot.data.grid_coord).is_none());
    }

    let _ = harness.dispatch(Command::SetViewport { bounds: home });
    let second = query::cell_view(&harness.world).into_vec();
    assert_eq!(first, second);
    assert!(harness.memory.is_empty(), "unmodified cells are never persisted");
}

#[test]
fn modified_cells_restore_from_memory() {
    let mut harness = Harness::new(Lifecycle::new(Spawning::with_oracle(
        EveryOtherColumn,
        unit_rules(),
    )));
    let home = bounds(0.0, 0.0, 2.0, 0.0);
    let _ = harness.dispatch(Command::SetViewport { bounds: home });
    let _ = harness.dispatch(Command::MovePlayer {
        position: GeoPoint::new(0.0, 0.0),
    });

    let target = GridCoord::new(0, 0);
    let _ = harness.dispatch(Command::SetCellInteractive {
        coord: target,
        interactive: true,
    });
    let _ = harness.dispatch(Command::InteractCell { coord: target });
    assert_eq!(query::inventory(&harness.world), Some(Token::new(1)));

    let culled = harness.dispatch(Command::SetViewport {
        bounds: bounds(10.0, 10.0, 12.0, 10.0),
    });
    assert!(culled.contains(&Event::CellCulled {
        coord: target,
        modified: true,
    }));

    let restored = harness.dispatch(Command::SetViewport { bounds: home });
    let expected = CellData {
        token: None,
        grid_coord: target,
        modified: true,
    };
    assert!(restored.contains(&Event::CellRestored { data: expected }));
    assert!(restored.contains(&Event::CellSpawned {
        data: CellData::generated(GridCoord::new(2, 0), Some(Token::new(1))),
    }));

    let snapshot = query::cell(&harness.world, target).expect("restored cell is live");
    assert_eq!(snapshot.data, expected);
    assert!(!snapshot.interactive, "restored cells start non-interactive");
}

#[test]
fn overlapping_viewports_keep_shared_cells_live() {
    let mut harness = Harness::new(Lifecycle::new(Spawning::with_oracle(
        EveryOtherColumn,
        unit_rules(),
    )));
    let _ = harness.dispatch(Command::SetViewport {
        bounds: bounds(0.0, 0.0, 2.0, 0.0),
    });

    let events = harness.dispatch(Command::SetViewport {
        bounds: bounds(2.0, 0.0, 4.0, 0.0),
    });

    let spawned: Vec<GridCoord> = events
        .iter()
        .filter_map(|event| match event {
            Event::CellSpawned { data } => Some(data.grid_coord),
            _ => None,
        })
        .collect();
    let culled: Vec<GridCoord> = events
        .iter()
        .filter_map(|event| match event {
            Event::CellCulled { coord, .. } => Some(*coord),
            _ => None,
        })
        .collect();

    assert_eq!(spawned, vec![GridCoord::new(4, 0)]);
    assert_eq!(culled, vec![GridCoord::new(0, 0)]);
}
