use fiefdom::building::BuildingKind;
use fiefdom::coordinate::Coordinate;
use fiefdom::error::GameError;
use fiefdom::player::PlayerId;
use fiefdom::resources::{ResourceKind, ResourceMap};
use fiefdom::scenario::{GeneratorKind, MapConfig, PlayerConfig, Scenario};
use fiefdom::tile::{Tile, TileKind};
use fiefdom::worker::WorkerKind;
use fiefdom::GameManager;

fn scenario(names: &[&str], rounds: u32, width: u32, height: u32) -> Scenario {
    Scenario {
        name: "proving-grounds".into(),
        seed: 42,
        rounds,
        map: MapConfig { width, height },
        // Weighted generation never places water, so every tile takes the
        // land-based buildings.
        generator: GeneratorKind::Weighted,
        players: names
            .iter()
            .map(|name| PlayerConfig {
                name: name.to_string(),
                color: None,
            })
            .collect(),
    }
}

fn first_tile(game: &GameManager) -> fiefdom::object::ObjectId {
    game.registry().tiles().next().unwrap().0
}

fn money(game: &GameManager, player: PlayerId) -> i64 {
    game.players()
        .get(player)
        .unwrap()
        .ledger()
        .get(ResourceKind::Money)
}

fn owner_at(game: &GameManager, x: i32, y: i32) -> Option<PlayerId> {
    let id = game.registry().tile_at(Coordinate::new(x, y)).unwrap();
    game.registry().tile(id).unwrap().core.owner()
}

#[test]
fn new_game_stands_at_round_one_player_zero() {
    let game = GameManager::new(&scenario(&["Aino", "Veikko"], 10, 5, 4)).unwrap();
    assert_eq!(game.current_round(), 1);
    assert_eq!(game.current_player(), PlayerId(0));
    assert_eq!(game.total_rounds(), 10);
    assert!(!game.is_game_over());
    assert_eq!(game.map_size(), (5, 4));
    assert_eq!(game.registry().tile_count(), 20);
    assert_eq!(game.players().len(), 2);
    assert_eq!(money(&game, PlayerId(0)), 200);
}

#[test]
fn duplicate_player_names_are_rejected() {
    let err = GameManager::new(&scenario(&["Aino", "Aino"], 10, 5, 4)).unwrap_err();
    assert!(matches!(err, GameError::InvalidScenario(_)));
}

#[test]
fn claiming_costs_money_and_transfers_ownership() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);

    game.claim_area(tile).unwrap();
    assert_eq!(game.registry().tile(tile).unwrap().core.owner(), Some(PlayerId(0)));
    assert_eq!(money(&game, PlayerId(0)), 175);

    // Owned tiles can't be claimed again, not even by the owner.
    let err = game.claim_area(tile).unwrap_err();
    assert!(matches!(err, GameError::OwnerConflict));
}

#[test]
fn claiming_without_funds_fails_cleanly() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.players_mut()
        .get_mut(PlayerId(0))
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 10)]));

    let err = game.claim_area(tile).unwrap_err();
    assert!(matches!(err, GameError::InsufficientFunds));
    assert_eq!(money(&game, PlayerId(0)), 10);
    assert!(game.registry().tile(tile).unwrap().core.owner().is_none());
}

#[test]
fn building_deducts_the_cost_table() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.claim_area(tile).unwrap();

    let farm = game.add_building_on_tile(tile, BuildingKind::Farm).unwrap();
    let ledger = game.players().get(PlayerId(0)).unwrap().ledger();
    assert_eq!(ledger.get(ResourceKind::Money), 125);
    assert_eq!(ledger.get(ResourceKind::Food), 100);
    assert_eq!(ledger.get(ResourceKind::Wood), 175);
    assert_eq!(ledger.get(ResourceKind::Stone), 200);

    assert!(game.registry().tile(tile).unwrap().buildings.contains(&farm));
    assert_eq!(game.registry().building(farm).unwrap().tile, Some(tile));
}

#[test]
fn building_on_foreign_or_unowned_tiles_is_refused() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);

    let err = game.add_building_on_tile(tile, BuildingKind::Farm).unwrap_err();
    assert!(matches!(err, GameError::OwnerConflict));
}

#[test]
fn unaffordable_buildings_leave_the_ledger_alone() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.claim_area(tile).unwrap();
    game.players_mut()
        .get_mut(PlayerId(0))
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 60)]));

    let err = game.add_building_on_tile(tile, BuildingKind::Farm).unwrap_err();
    assert!(matches!(err, GameError::InsufficientFunds));
    assert_eq!(money(&game, PlayerId(0)), 60);
    assert!(game.registry().tile(tile).unwrap().buildings.is_empty());
}

#[test]
fn ocean_accepts_only_fishing_boats() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let ocean = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Ocean, Coordinate::new(100, 100)));
    game.claim_area(ocean).unwrap();

    let err = game.add_building_on_tile(ocean, BuildingKind::Farm).unwrap_err();
    assert!(matches!(err, GameError::IllegalPlacement(_)));

    game.add_building_on_tile(ocean, BuildingKind::FishingBoat).unwrap();

    // No worker slots at sea.
    let err = game.add_worker_on_tile(ocean, WorkerKind::Basic).unwrap_err();
    assert!(matches!(err, GameError::InsufficientSpace { .. }));
}

#[test]
fn lakes_accept_cottages_and_boats_only() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let lake = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Lake, Coordinate::new(100, 100)));
    game.claim_area(lake).unwrap();

    assert!(matches!(
        game.add_building_on_tile(lake, BuildingKind::Farm),
        Err(GameError::IllegalPlacement(_))
    ));
    assert!(matches!(
        game.add_building_on_tile(lake, BuildingKind::Mine),
        Err(GameError::IllegalPlacement(_))
    ));

    game.add_building_on_tile(lake, BuildingKind::Cottage).unwrap();
}

#[test]
fn hiring_a_worker_deducts_the_recruitment_cost() {
    let mut game = GameManager::new(&scenario(&["Aino"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.claim_area(tile).unwrap();

    let worker = game.add_worker_on_tile(tile, WorkerKind::Basic).unwrap();
    let ledger = game.players().get(PlayerId(0)).unwrap().ledger();
    assert_eq!(ledger.get(ResourceKind::Money), 165);
    assert_eq!(ledger.get(ResourceKind::Food), 175);
    assert!(game.registry().tile(tile).unwrap().workers.contains(&worker));
}

#[test]
fn headquarters_claims_a_radius_of_three() {
    let mut game = GameManager::new(&scenario(&["Aino", "Veikko"], 10, 9, 9)).unwrap();
    game.players_mut()
        .get_mut(PlayerId(0))
        .unwrap()
        .set_ledger(ResourceMap::from([
            (ResourceKind::Money, 2000),
            (ResourceKind::Food, 2000),
            (ResourceKind::Wood, 2000),
            (ResourceKind::Stone, 2000),
        ]));

    let center = game.registry().tile_at(Coordinate::new(4, 4)).unwrap();
    game.claim_area(center).unwrap();

    // A rival holding inside the radius must survive the land grab.
    let rival_tile = game.registry().tile_at(Coordinate::new(5, 5)).unwrap();
    game.registry_mut()
        .tile_mut(rival_tile)
        .unwrap()
        .core
        .set_owner(Some(PlayerId(1)));

    game.add_building_on_tile(center, BuildingKind::HeadQuarters).unwrap();

    assert_eq!(owner_at(&game, 4, 4), Some(PlayerId(0)));
    assert_eq!(owner_at(&game, 1, 1), Some(PlayerId(0)));
    assert_eq!(owner_at(&game, 7, 7), Some(PlayerId(0)));
    assert_eq!(owner_at(&game, 5, 5), Some(PlayerId(1)));
    assert_eq!(owner_at(&game, 0, 0), None);
    assert_eq!(owner_at(&game, 8, 8), None);
}

#[test]
fn outpost_claims_a_radius_of_one() {
    let mut game = GameManager::new(&scenario(&["Aino", "Veikko"], 10, 9, 9)).unwrap();

    let center = game.registry().tile_at(Coordinate::new(4, 4)).unwrap();
    game.claim_area(center).unwrap();

    let rival_tile = game.registry().tile_at(Coordinate::new(5, 5)).unwrap();
    game.registry_mut()
        .tile_mut(rival_tile)
        .unwrap()
        .core
        .set_owner(Some(PlayerId(1)));

    game.add_building_on_tile(center, BuildingKind::Outpost).unwrap();

    assert_eq!(owner_at(&game, 4, 4), Some(PlayerId(0)));
    assert_eq!(owner_at(&game, 3, 3), Some(PlayerId(0)));
    assert_eq!(owner_at(&game, 4, 5), Some(PlayerId(0)));
    assert_eq!(owner_at(&game, 5, 5), Some(PlayerId(1)));
    assert_eq!(owner_at(&game, 4, 6), None);
    assert_eq!(owner_at(&game, 6, 6), None);
}

#[test]
fn holdings_shrink_as_owned_objects_die() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.claim_area(tile).unwrap();
    let farm = game.add_building_on_tile(tile, BuildingKind::Farm).unwrap();
    let worker = game.add_worker_on_tile(tile, WorkerKind::Basic).unwrap();

    assert_eq!(game.player_holdings(PlayerId(0)), vec![farm, worker]);

    game.remove_building(farm).unwrap();
    assert_eq!(game.player_holdings(PlayerId(0)), vec![worker]);

    assert!(game.player_holdings(PlayerId(99)).is_empty());
}

#[test]
fn turns_cycle_players_and_rounds_until_game_over() {
    let mut game = GameManager::new(&scenario(&["Aino", "Veikko"], 10, 3, 2)).unwrap();

    game.end_turn().unwrap();
    assert_eq!(game.current_player(), PlayerId(1));
    assert_eq!(game.current_round(), 1);

    game.end_turn().unwrap();
    assert_eq!(game.current_player(), PlayerId(0));
    assert_eq!(game.current_round(), 2);

    let mut turns = 2;
    while !game.is_game_over() {
        game.end_turn().unwrap();
        turns += 1;
    }
    assert_eq!(turns, 20);
    assert_eq!(game.current_round(), 10);

    // Further calls change nothing.
    game.end_turn().unwrap();
    assert!(game.is_game_over());
    assert_eq!(game.current_round(), 10);
}

#[test]
fn round_count_can_grow_but_never_shrink_past_the_present() {
    let mut game = GameManager::new(&scenario(&["Solo"], 15, 3, 2)).unwrap();

    assert!(!game.set_round_count(9));
    assert!(game.set_round_count(16));
    assert_eq!(game.total_rounds(), 16);

    for _ in 0..11 {
        game.end_turn().unwrap();
    }
    assert_eq!(game.current_round(), 12);

    assert!(!game.set_round_count(11));
    assert!(game.set_round_count(12));
    assert_eq!(game.total_rounds(), 12);

    game.end_turn().unwrap();
    assert!(game.is_game_over());
    assert_eq!(game.current_round(), 12);
}

#[test]
fn starved_tiles_lose_their_occupants_at_end_of_turn() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.claim_area(tile).unwrap();
    let outpost = game.add_building_on_tile(tile, BuildingKind::Outpost).unwrap();

    // Nothing left to pay the outpost's food upkeep with.
    game.players_mut()
        .get_mut(PlayerId(0))
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 25)]));

    game.end_turn().unwrap();
    assert!(game.registry().building(outpost).is_none());
    assert!(game.registry().tile(tile).unwrap().buildings.is_empty());
    assert_eq!(money(&game, PlayerId(0)), 25);
}

#[test]
fn earlier_tiles_feed_the_treasury_before_starvation_is_judged() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let player = PlayerId(0);

    // A cottage lake created before the outpost's tile produces first.
    let lake = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Lake, Coordinate::new(100, 100)));
    let plain = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Grassland, Coordinate::new(101, 100)));
    for tile in [lake, plain] {
        game.registry_mut().tile_mut(tile).unwrap().core.set_owner(Some(player));
    }
    let cottage = game.registry_mut().create_building(BuildingKind::Cottage, Some(player));
    game.registry_mut().add_building_to_tile(lake, cottage).unwrap();
    let outpost = game.registry_mut().create_building(BuildingKind::Outpost, Some(player));
    game.registry_mut().add_building_to_tile(plain, outpost).unwrap();

    // One money is not enough for the outpost's upkeep on its own; the
    // cottage's income arrives first and covers it.
    game.players_mut()
        .get_mut(player)
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 1)]));

    game.end_turn().unwrap();
    assert!(game.registry().building(outpost).is_some());
    let ledger = game.players().get(player).unwrap().ledger();
    assert_eq!(ledger.get(ResourceKind::Money), 0);
    assert_eq!(ledger.get(ResourceKind::Food), 6);
}

#[test]
fn production_order_follows_tile_creation_order() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let player = PlayerId(0);

    // Same setup as above with the outpost's tile created first: its
    // upkeep is judged before the cottage income arrives, so it starves.
    let plain = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Grassland, Coordinate::new(100, 100)));
    let lake = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Lake, Coordinate::new(101, 100)));
    for tile in [plain, lake] {
        game.registry_mut().tile_mut(tile).unwrap().core.set_owner(Some(player));
    }
    let outpost = game.registry_mut().create_building(BuildingKind::Outpost, Some(player));
    game.registry_mut().add_building_to_tile(plain, outpost).unwrap();
    let cottage = game.registry_mut().create_building(BuildingKind::Cottage, Some(player));
    game.registry_mut().add_building_to_tile(lake, cottage).unwrap();

    game.players_mut()
        .get_mut(player)
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 1)]));

    game.end_turn().unwrap();
    assert!(game.registry().building(outpost).is_none());
    let ledger = game.players().get(player).unwrap().ledger();
    assert_eq!(ledger.get(ResourceKind::Money), 5);
    assert_eq!(ledger.get(ResourceKind::Food), 8);
}

#[test]
fn starved_tiles_shed_workers_and_buildings_alike() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let player = PlayerId(0);

    let plain = game
        .registry_mut()
        .add_tile(|id| Tile::new(id, TileKind::Grassland, Coordinate::new(100, 100)));
    game.registry_mut().tile_mut(plain).unwrap().core.set_owner(Some(player));
    let worker = game.registry_mut().create_worker(WorkerKind::Basic, Some(player));
    game.registry_mut().add_worker_to_tile(plain, worker).unwrap();
    let outpost = game.registry_mut().create_building(BuildingKind::Outpost, Some(player));
    game.registry_mut().add_building_to_tile(plain, outpost).unwrap();

    game.players_mut().get_mut(player).unwrap().set_ledger(ResourceMap::new());

    game.end_turn().unwrap();
    assert!(game.registry().worker(worker).is_none());
    assert!(game.registry().building(outpost).is_none());
    let tile = game.registry().tile(plain).unwrap();
    assert!(tile.workers.is_empty());
    assert!(tile.buildings.is_empty());
}

#[test]
fn scoring_skips_owners_outside_the_roster() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.registry_mut().tile_mut(tile).unwrap().core.set_owner(Some(PlayerId(7)));

    // Starting ledger only: 200 each of wood/food/stone plus money doubled.
    assert_eq!(game.calculate_scores(), vec![(1000, "Solo".to_string())]);
}

#[test]
fn scores_weigh_ledger_holdings_and_sunk_costs() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    game.players_mut()
        .get_mut(PlayerId(0))
        .unwrap()
        .set_ledger(ResourceMap::from([
            (ResourceKind::Wood, 10),
            (ResourceKind::Food, 10),
            (ResourceKind::Stone, 10),
            (ResourceKind::Ore, 5),
            (ResourceKind::Money, 20),
        ]));

    let tiles: Vec<_> = game.registry().tiles().map(|(id, _)| id).take(2).collect();
    for id in &tiles {
        game.registry_mut().tile_mut(*id).unwrap().core.set_owner(Some(PlayerId(0)));
    }
    let farm = game.registry_mut().create_building(BuildingKind::Farm, Some(PlayerId(0)));
    game.registry_mut().add_building_to_tile(tiles[0], farm).unwrap();
    let worker = game.registry_mut().create_worker(WorkerKind::Basic, Some(PlayerId(0)));
    game.registry_mut().add_worker_to_tile(tiles[0], worker).unwrap();

    // Ledger 80, two tiles 100, farm cost 225, worker cost 45.
    assert_eq!(game.calculate_scores(), vec![(450, "Solo".to_string())]);
}

#[test]
fn ranking_is_sorted_ascending_by_score() {
    let mut game = GameManager::new(&scenario(&["Aino", "Veikko"], 10, 3, 2)).unwrap();
    game.players_mut()
        .get_mut(PlayerId(0))
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 100)]));
    game.players_mut()
        .get_mut(PlayerId(1))
        .unwrap()
        .set_ledger(ResourceMap::from([(ResourceKind::Money, 10)]));

    let ranking = game.calculate_scores();
    assert_eq!(ranking, vec![(20, "Veikko".to_string()), (200, "Aino".to_string())]);
}

#[test]
fn removal_tears_down_wherever_the_object_stands() {
    let mut game = GameManager::new(&scenario(&["Solo"], 10, 3, 2)).unwrap();
    let tile = first_tile(&game);
    game.claim_area(tile).unwrap();
    let farm = game.add_building_on_tile(tile, BuildingKind::Farm).unwrap();
    let worker = game.add_worker_on_tile(tile, WorkerKind::Basic).unwrap();

    game.remove_building(farm).unwrap();
    game.remove_worker(worker).unwrap();
    assert!(game.registry().tile(tile).unwrap().buildings.is_empty());
    assert!(game.registry().tile(tile).unwrap().workers.is_empty());

    // No refunds: the costs stay spent.
    assert_eq!(money(&game, PlayerId(0)), 115);
}
