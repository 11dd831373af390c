//! Tests for working-hours normalization and break splitting.

use std::collections::BTreeMap;

use availability_engine::normalize::apply_breaks;
use availability_engine::{
    normalize_working_hours, AvailabilityError, DayConfig, WorkingHoursBlock,
    WorkingHoursResponse, WorkingHoursSlot,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn slot(start_hour: i32, end_hour: i32) -> WorkingHoursSlot {
    WorkingHoursSlot::new(start_hour * 60, end_hour * 60)
}

fn day(hours: Vec<WorkingHoursSlot>, breaks: Vec<WorkingHoursSlot>) -> DayConfig {
    DayConfig {
        hours: Some(hours),
        breaks: if breaks.is_empty() { None } else { Some(breaks) },
    }
}

fn response(days: Vec<(&str, DayConfig)>) -> WorkingHoursResponse {
    WorkingHoursResponse {
        week_day_config: Some(
            days.into_iter()
                .map(|(code, config)| (code.to_string(), config))
                .collect::<BTreeMap<_, _>>(),
        ),
        timezone: Some("Europe/London".to_string()),
    }
}

fn spans(blocks: &[WorkingHoursBlock]) -> Vec<(&str, &str)> {
    blocks.iter().map(|b| (b.start_time(), b.end_time())).collect()
}

// ── apply_breaks ────────────────────────────────────────────────────────────

#[test]
fn break_in_the_middle_splits_slot_in_two() {
    let pieces = apply_breaks(slot(9, 17), &[slot(12, 13)]);
    assert_eq!(pieces, vec![slot(9, 12), slot(13, 17)]);
}

#[test]
fn break_covering_whole_slot_keeps_original_slot() {
    let pieces = apply_breaks(slot(9, 17), &[slot(9, 17)]);
    assert_eq!(pieces, vec![slot(9, 17)]);
}

#[test]
fn unsorted_breaks_are_sorted_before_the_walk() {
    let pieces = apply_breaks(slot(8, 18), &[slot(15, 16), slot(10, 11)]);
    assert_eq!(pieces, vec![slot(8, 10), slot(11, 15), slot(16, 18)]);
}

#[test]
fn overlapping_breaks_do_not_emit_empty_pieces() {
    let pieces = apply_breaks(slot(9, 17), &[slot(12, 14), slot(13, 15)]);
    assert_eq!(pieces, vec![slot(9, 12), slot(14, 17)]);
}

#[test]
fn breaks_outside_slot_are_ignored() {
    let pieces = apply_breaks(slot(9, 12), &[slot(6, 7), slot(13, 14)]);
    assert_eq!(pieces, vec![slot(9, 12)]);
}

#[test]
fn break_at_slot_start_is_not_applied() {
    // A break must start strictly after the cursor to split the slot.
    let pieces = apply_breaks(slot(9, 17), &[slot(9, 10)]);
    assert_eq!(pieces, vec![slot(9, 17)]);
}

#[test]
fn break_running_past_slot_end_truncates_slot() {
    let pieces = apply_breaks(slot(9, 17), &[slot(16, 19)]);
    assert_eq!(pieces, vec![slot(9, 16)]);
}

// ── normalize_working_hours ─────────────────────────────────────────────────

#[test]
fn monday_slot_becomes_single_monday_block() {
    let data = normalize_working_hours(&response(vec![("MO", day(vec![slot(9, 17)], vec![]))]))
        .unwrap();

    assert_eq!(data.blocks.len(), 1);
    let block = &data.blocks[0];
    assert_eq!(block.days_of_week().iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(block.start_time(), "09:00");
    assert_eq!(block.end_time(), "17:00");
    assert_eq!(block.start_minutes(), 540);
    assert_eq!(block.end_minutes(), 1020);
    assert_eq!(data.timezone, "Europe/London");
}

#[test]
fn blocks_are_emitted_in_weekday_order() {
    let data = normalize_working_hours(&response(vec![
        ("SA", day(vec![slot(10, 14)], vec![])),
        ("SU", day(vec![slot(11, 15)], vec![])),
        ("WE", day(vec![slot(9, 17)], vec![])),
    ]))
    .unwrap();

    let days: Vec<u8> = data
        .blocks
        .iter()
        .map(|b| *b.days_of_week().iter().next().unwrap())
        .collect();
    assert_eq!(days, vec![0, 3, 6]);
}

#[test]
fn each_slot_is_split_by_the_days_breaks() {
    let data = normalize_working_hours(&response(vec![(
        "TU",
        day(vec![slot(8, 12), slot(13, 18)], vec![slot(10, 11), slot(15, 16)]),
    )]))
    .unwrap();

    assert_eq!(
        spans(&data.blocks),
        vec![
            ("08:00", "10:00"),
            ("11:00", "12:00"),
            ("13:00", "15:00"),
            ("16:00", "18:00"),
        ]
    );
}

#[test]
fn minute_precision_survives_normalization() {
    let data = normalize_working_hours(&response(vec![(
        "FR",
        day(
            vec![WorkingHoursSlot::new(570, 1035)],
            vec![WorkingHoursSlot::new(750, 795)],
        ),
    )]))
    .unwrap();

    assert_eq!(spans(&data.blocks), vec![("09:30", "12:30"), ("13:15", "17:15")]);
}

#[test]
fn days_without_hours_produce_no_blocks() {
    let data = normalize_working_hours(&response(vec![
        ("MO", DayConfig::default()),
        ("TU", day(vec![], vec![slot(12, 13)])),
        ("WE", day(vec![slot(9, 17)], vec![])),
    ]))
    .unwrap();

    assert_eq!(data.blocks.len(), 1);
    assert!(data.blocks[0].applies_to(3));
}

#[test]
fn missing_week_config_yields_no_blocks_and_default_timezone() {
    let data = normalize_working_hours(&WorkingHoursResponse::default()).unwrap();
    assert!(data.blocks.is_empty());
    assert_eq!(data.timezone, "Asia/Kolkata");
}

#[test]
fn unknown_weekday_keys_are_ignored() {
    let data = normalize_working_hours(&response(vec![
        ("XX", day(vec![slot(9, 17)], vec![])),
        ("mo", day(vec![slot(9, 17)], vec![])),
    ]))
    .unwrap();
    assert!(data.blocks.is_empty());
}

#[test]
fn slot_ending_at_midnight_is_accepted() {
    let data = normalize_working_hours(&response(vec![("SU", day(vec![slot(20, 24)], vec![]))]))
        .unwrap();
    assert_eq!(spans(&data.blocks), vec![("20:00", "24:00")]);
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn reversed_break_is_rejected() {
    let result = normalize_working_hours(&response(vec![(
        "MO",
        day(vec![slot(9, 17)], vec![slot(13, 12)]),
    )]));

    match result {
        Err(AvailabilityError::InvalidInterval { day, start, end, .. }) => {
            assert_eq!(day, "MO break");
            assert_eq!((start, end), (780, 720));
        }
        other => panic!("expected InvalidInterval, got {other:?}"),
    }
}

#[test]
fn break_outside_the_day_is_rejected() {
    let result = normalize_working_hours(&response(vec![(
        "MO",
        day(vec![slot(9, 17)], vec![WorkingHoursSlot::new(-30, 60)]),
    )]));
    assert!(matches!(result, Err(AvailabilityError::InvalidInterval { .. })));

    let result = normalize_working_hours(&response(vec![(
        "MO",
        day(vec![slot(9, 17)], vec![WorkingHoursSlot::new(1440, 1500)]),
    )]));
    assert!(matches!(result, Err(AvailabilityError::InvalidInterval { .. })));
}

#[test]
fn empty_slot_is_rejected() {
    let result = normalize_working_hours(&response(vec![("WE", day(vec![slot(9, 9)], vec![]))]));
    assert!(matches!(result, Err(AvailabilityError::InvalidInterval { .. })));
}

#[test]
fn invalid_breaks_on_closed_days_are_not_inspected() {
    let data = normalize_working_hours(&response(vec![(
        "MO",
        day(vec![], vec![slot(13, 12)]),
    )]))
    .unwrap();
    assert!(data.blocks.is_empty());
}

// ── Wire format ─────────────────────────────────────────────────────────────

#[test]
fn parses_api_payload_with_two_letter_keys() {
    let json = r#"{
        "weekDayConfig": {
            "MO": { "hours": [{ "start": 540, "end": 1020 }], "breaks": [{ "start": 720, "end": 780 }] },
            "SA": { "hours": [] }
        },
        "timezone": "Asia/Kolkata"
    }"#;

    let response: WorkingHoursResponse = serde_json::from_str(json).unwrap();
    let data = normalize_working_hours(&response).unwrap();

    assert_eq!(spans(&data.blocks), vec![("09:00", "12:00"), ("13:00", "17:00")]);
    assert!(data.blocks.iter().all(|b| b.applies_to(1)));
}

#[test]
fn null_day_is_closed_and_other_days_survive() {
    let json = r#"{
        "weekDayConfig": {
            "MO": null,
            "TU": { "hours": [{ "start": 540, "end": 1020 }] }
        }
    }"#;

    let response: WorkingHoursResponse = serde_json::from_str(json).unwrap();
    let data = normalize_working_hours(&response).unwrap();

    assert_eq!(spans(&data.blocks), vec![("09:00", "17:00")]);
    assert!(data.blocks[0].applies_to(2));
    assert!(!data.blocks[0].applies_to(1));
}

#[test]
fn mistyped_hours_and_breaks_read_as_absent() {
    let json = r#"{
        "weekDayConfig": {
            "MO": { "hours": null, "breaks": "none" },
            "TU": { "hours": [{ "start": 540, "end": 1020 }], "breaks": "none" },
            "WE": { "hours": "9-5" },
            "TH": "closed"
        }
    }"#;

    let response: WorkingHoursResponse = serde_json::from_str(json).unwrap();
    let week = response.week_day_config.as_ref().unwrap();
    assert_eq!(week["MO"], DayConfig::default());
    assert_eq!(week["TH"], DayConfig::default());
    assert_eq!(week["TU"].breaks, None);

    let data = normalize_working_hours(&response).unwrap();
    assert_eq!(spans(&data.blocks), vec![("09:00", "17:00")]);
    assert!(data.blocks[0].applies_to(2));
}

#[test]
fn malformed_week_config_means_no_blocks() {
    let response: WorkingHoursResponse =
        serde_json::from_str(r#"{"weekDayConfig": [1, 2, 3], "timezone": "UTC"}"#).unwrap();
    let data = normalize_working_hours(&response).unwrap();
    assert!(data.blocks.is_empty());
    assert_eq!(data.timezone, "UTC");
}

#[test]
fn well_typed_out_of_range_interval_is_still_rejected() {
    let json = r#"{"weekDayConfig": {"MO": {"hours": [{"start": 540, "end": 1500}]}}}"#;
    let response: WorkingHoursResponse = serde_json::from_str(json).unwrap();
    let err = normalize_working_hours(&response).unwrap_err();
    assert!(matches!(err, AvailabilityError::InvalidInterval { .. }));
}

#[test]
fn blocks_serialize_in_camel_case_and_validate_on_the_way_back() {
    let block = WorkingHoursBlock::new([1, 3], 540, 1020).unwrap();
    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "daysOfWeek": [1, 3],
            "startTime": "09:00",
            "endTime": "17:00",
            "startMinutes": 540,
            "endMinutes": 1020
        })
    );

    let back: WorkingHoursBlock = serde_json::from_value(json).unwrap();
    assert_eq!(back, block);

    let mismatched = serde_json::json!({
        "daysOfWeek": [1],
        "startTime": "10:00",
        "endTime": "17:00",
        "startMinutes": 540,
        "endMinutes": 1020
    });
    assert!(serde_json::from_value::<WorkingHoursBlock>(mismatched).is_err());
}

#[test]
fn block_constructor_rejects_bad_days_and_ranges() {
    assert!(WorkingHoursBlock::new(Vec::<u8>::new(), 540, 600).is_err());
    assert!(WorkingHoursBlock::new([7], 540, 600).is_err());
    assert!(WorkingHoursBlock::new([1], 600, 540).is_err());
    assert!(WorkingHoursBlock::new([1], 600, 1441).is_err());
}
