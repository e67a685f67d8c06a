use questionnaire_core::{Countdown, PageConfig, TimeParts, TICK_INTERVAL_MS};

#[test]
fn untimed_pages_have_no_countdown() {
    let config = PageConfig::default();
    assert!(Countdown::from_config(&config).is_none());

    let timed = PageConfig {
        timed: true,
        time_limit_secs: 90,
        ..PageConfig::default()
    };
    let countdown = Countdown::from_config(&timed).expect("timed page");
    assert_eq!(countdown.total_secs(), 90);
    assert_eq!(countdown.display(), TimeParts { hours: 0, minutes: 1, seconds: 30 });
}

#[test]
fn duration_equals_total_after_total_ticks() {
    let total = 5;
    let mut countdown = Countdown::new(total);
    let mut now = 0.0;
    let mut delay = countdown.start(now);

    let mut last = None;
    for _ in 0..total {
        now += delay;
        let tick = countdown.tick(now);
        delay = tick.next_delay_ms;
        last = Some(tick);
    }

    let last = last.expect("ticked");
    assert_eq!(last.elapsed_secs, i64::from(total));
    assert_eq!(last.display, TimeParts::default());
    assert!(countdown.is_expired());
}

#[test]
fn display_clamps_after_expiry() {
    let mut countdown = Countdown::new(1);
    countdown.start(0.0);
    countdown.tick(1000.0);
    let tick = countdown.tick(2000.0);

    assert_eq!(countdown.remaining(), -1);
    assert_eq!(tick.display, TimeParts::default());
    assert_eq!(tick.display.clock(), "00:00:00");
    assert_eq!(tick.elapsed_secs, 2);
}

#[test]
fn late_tick_shortens_next_delay() {
    let mut countdown = Countdown::new(60);
    assert_eq!(countdown.start(10_000.0), TICK_INTERVAL_MS);

    let late = countdown.tick(11_250.0);
    assert_eq!(late.next_delay_ms, 750.0);

    // Deadline is virtual: the next one is 12_000 regardless of the late run.
    let early = countdown.tick(11_900.0);
    assert_eq!(early.next_delay_ms, 1100.0);
}

#[test]
fn very_late_tick_fires_next_immediately() {
    let mut countdown = Countdown::new(60);
    countdown.start(0.0);
    let tick = countdown.tick(3500.0);
    assert_eq!(tick.next_delay_ms, 0.0);
}

#[test]
fn time_parts_split_hours_minutes_seconds() {
    assert_eq!(
        TimeParts::from_remaining(3 * 3600 + 25 * 60 + 7),
        TimeParts { hours: 3, minutes: 25, seconds: 7 }
    );
    assert_eq!(TimeParts::from_remaining(-3661), TimeParts::default());
    assert_eq!(TimeParts::from_remaining(59).clock(), "00:00:59");
}
