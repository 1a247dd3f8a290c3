use std::cell::RefCell;
use std::hash::Hasher;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use footle_game::{
    Catalog, CatalogProvider, ChallengeSource, ControllerState, DailySession, FootleConfig,
    GameMode, GameStore, GuessRow, KeyValueStore, MemoryStore, ModeController, MountOutcome,
    ProgressStatus, RefreshOutcome, daily_challenges_for, mount, share_text,
};
use futures::executor::block_on;
use twox_hash::XxHash64;

const ROWS_SNAPSHOT_HASH: u64 = 0x5073_df5f_5b86_9ae2;

fn catalog() -> Catalog {
    Catalog::from_json(include_str!("../../footle-web/static/data/footballers.json")).unwrap()
}

fn fixed_provider() -> CatalogProvider {
    let rows = serde_json::from_str(include_str!(
        "../../footle-web/static/data/daily_challenge.json"
    ))
    .unwrap();
    CatalogProvider::new(catalog(), ChallengeSource::Fixed(rows), 25)
}

fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 7, 30, 0).unwrap()
}

fn open(raw: &MemoryStore, now: DateTime<Utc>) -> RefCell<DailySession<MemoryStore>> {
    RefCell::new(DailySession::open(GameStore::new(raw.clone(), "footle"), now))
}

fn controller(mode: GameMode) -> RefCell<ModeController> {
    RefCell::new(ModeController::new(mode, &FootleConfig::default_config()).unwrap())
}

fn guess(
    cell: &RefCell<ModeController>,
    daily: &RefCell<DailySession<MemoryStore>>,
    id: u32,
    today: NaiveDate,
) -> bool {
    let footballer = catalog().get(id).cloned().unwrap();
    cell.borrow_mut()
        .submit_guess(&footballer, &mut *daily.borrow_mut(), today)
        .unwrap()
        .solved
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

#[test]
fn sample_data_parses() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 32);
    let cfg = FootleConfig::from_json(include_str!("../../footle-web/static/data/footle.json"))
        .unwrap();
    assert_eq!(cfg, FootleConfig::default_config());
}

#[test]
fn classic_rows_snapshot_stable() {
    let raw = MemoryStore::new();
    let daily = open(&raw, morning());
    let provider = fixed_provider();
    block_on(async {
        assert_eq!(
            daily.borrow_mut().refresh_challenges(&provider).await,
            RefreshOutcome::Refreshed
        );
    });
    let today = morning().date_naive();
    let cell = controller(GameMode::Classic);
    assert_eq!(
        block_on(mount(&cell, &daily, &provider, today)),
        MountOutcome::Ready(ControllerState::AwaitingGuess)
    );

    let mut solved = false;
    for id in [1, 22, 8, 15, 7] {
        solved = guess(&cell, &daily, id, today);
    }
    assert!(solved);

    let rows: Vec<GuessRow> = cell.borrow().rows().to_vec();
    let canonical = serde_json::to_string_pretty(&rows).unwrap();
    assert_eq!(
        snapshot_hash(canonical.as_bytes()),
        ROWS_SNAPSHOT_HASH,
        "classic rows snapshot changed\n{canonical}"
    );
}

#[test]
fn a_full_day_across_reloads() {
    let raw = MemoryStore::new();
    let provider = fixed_provider();
    let today = morning().date_naive();

    {
        let daily = open(&raw, morning());
        block_on(daily.borrow_mut().refresh_challenges(&provider));
        let pixel = controller(GameMode::Pixel);
        block_on(mount(&pixel, &daily, &provider, today));
        assert!(!guess(&pixel, &daily, 3, today));
        assert!(!guess(&pixel, &daily, 4, today));
        assert!(guess(&pixel, &daily, 10, today));
        assert_eq!(daily.borrow().completion_percent(), 33);
    }

    // reload later the same day: the cached mapping serves before any refresh
    let daily = open(&raw, Utc.with_ymd_and_hms(2025, 5, 1, 22, 0, 0).unwrap());
    assert!(!daily.borrow().purged_on_open());
    assert_eq!(daily.borrow().target_id(GameMode::Pixel), Some(10));
    let pixel = controller(GameMode::Pixel);
    assert_eq!(
        block_on(mount(&pixel, &daily, &provider, today)),
        MountOutcome::Ready(ControllerState::Solved)
    );
    let text = share_text(GameMode::Pixel, pixel.borrow().rows(), true, "https://footle.xyz");
    assert_eq!(
        text,
        "Footle Pixel 3/?\nMohamed Salah\nErling Haaland\nKylian Mbappé\nhttps://footle.xyz/pixel"
    );
    let reveal = pixel.borrow().reveal().map(footle_game::RevealMeter::wrong_guesses);
    assert_eq!(reveal, Some(2));

    // next day everything daily is gone, the marker moves on
    let next = open(&raw, Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 1).unwrap());
    assert!(next.borrow().purged_on_open());
    assert_eq!(next.borrow().status(GameMode::Pixel), ProgressStatus::NotStarted);
    assert!(raw.get_item("footle:pixel:session").is_none());
    assert_eq!(raw.get_item("footle:lastDate").as_deref(), Some("2025-05-02"));
}

#[test]
fn scheduled_provider_is_stable_per_day() {
    let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
    let provider = CatalogProvider::new(
        catalog(),
        ChallengeSource::Scheduled { date, salt: 0 },
        25,
    );
    let raw_a = MemoryStore::new();
    let raw_b = MemoryStore::new();
    let a = open(&raw_a, morning());
    let b = open(&raw_b, morning());
    block_on(a.borrow_mut().refresh_challenges(&provider));
    block_on(b.borrow_mut().refresh_challenges(&provider));
    assert_eq!(a.borrow().challenges(), b.borrow().challenges());
    assert_eq!(
        a.borrow().challenges(),
        &daily_challenges_for(date, provider.catalog(), 0)
    );
    assert_eq!(a.borrow().target_id(GameMode::Emoji), None);
}

#[test]
fn rapid_guesses_are_each_persisted() {
    let raw = MemoryStore::new();
    let provider = fixed_provider();
    let today = morning().date_naive();
    let daily = open(&raw, morning());
    block_on(daily.borrow_mut().refresh_challenges(&provider));
    let sil = controller(GameMode::Silhouette);
    block_on(mount(&sil, &daily, &provider, today));

    for (n, id) in [2, 3, 4, 5, 6].into_iter().enumerate() {
        guess(&sil, &daily, id, today);
        let stored: serde_json::Value =
            serde_json::from_str(&raw.get_item("footle:silhouette:session").unwrap()).unwrap();
        assert_eq!(stored["guesses"].as_array().map(Vec::len), Some(n + 1));
    }
    assert_eq!(
        daily.borrow().status(GameMode::Silhouette),
        ProgressStatus::InProgress
    );
}
