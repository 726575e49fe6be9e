use chrono::{NaiveDate, NaiveDateTime};
use formwork_engine::{
    Bounds, DetailBody, FormatContext, ListQuery, ListView, Presentation, ResolvedLayout, escape_html, format_value,
    place_menu, render_detail, render_detail_html, render_list, string_repr,
};
use formwork_types::{Block, Column, Field, FieldType, Layout, LayoutMode, LayoutStage, ListConfig, ObjectSchema, Record, Section};
use proptest::prelude::*;
use serde_json::{Value, json};

/// 1900-01-01 through 2199-12-31 in epoch milliseconds.
const EPOCH_MILLIS_RANGE: std::ops::Range<i64> = -2_208_988_800_000..7_258_118_400_000;

const FIELD_NAMES: [&str; 4] = ["name", "city", "code", "note"];

fn schema() -> ObjectSchema {
    ObjectSchema {
        name: "thing".into(),
        label: "Thing".into(),
        fields: FIELD_NAMES.iter().map(|name| Field::new(*name, FieldType::Text)).collect(),
    }
}

fn record_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(prop::collection::vec(prop::option::of("[a-cA-C0-9 ]{0,6}"), 4), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, values)| {
                values
                    .into_iter()
                    .zip(FIELD_NAMES)
                    .fold(Record::new(format!("r{index}")), |record, (value, name)| match value {
                        Some(value) => record.with_value(name, value),
                        None => record,
                    })
            })
            .collect()
    })
}

fn plain_layout(columns: Vec<String>) -> ResolvedLayout {
    ResolvedLayout::new(
        Layout {
            layout_mode: None,
            sections: vec![],
            list_config: Some(ListConfig { columns }),
        },
        LayoutStage::Published,
    )
}

fn row_ids(view: &ListView) -> Vec<String> {
    view.rows().iter().map(|row| row.record_id.to_string()).collect()
}

fn date_time_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (1900i32..2200, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_filter_map(
        "valid calendar date",
        |(year, month, day, hour, minute, second)| {
            NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
        },
    )
}

/// Stored date values: ISO strings, RFC3339 timestamps and epoch millis.
fn stored_date_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        date_time_strategy().prop_map(|date_time| json!(date_time.date().format("%Y-%m-%d").to_string())),
        date_time_strategy().prop_map(|date_time| json!(date_time.format("%Y-%m-%dT%H:%M:%S").to_string())),
        date_time_strategy().prop_map(|date_time| json!(date_time.and_utc().to_rfc3339())),
        EPOCH_MILLIS_RANGE.prop_map(|millis| json!(millis)),
    ]
}

proptest! {
    #[test]
    fn prop_search_keeps_matching_records_in_store_order(records in record_strategy(), needle in "[a-cA-C0-9]{0,2}") {
        let schema = schema();
        let layout = plain_layout(vec![]);
        let query = ListQuery { search_text: &needle, ..ListQuery::default() };
        let view = render_list(&records, &schema, Some(&layout), &query);

        let lowered = needle.to_lowercase();
        let expected: Vec<String> = records
            .iter()
            .filter(|record| FIELD_NAMES.iter().any(|name| string_repr(record.value(name)).to_lowercase().contains(&lowered)))
            .map(|record| record.id.to_string())
            .collect();
        prop_assert_eq!(row_ids(&view), expected);
    }

    #[test]
    fn prop_sort_orders_by_string_form_and_is_stable(records in record_strategy(), field in prop::sample::select(FIELD_NAMES.to_vec())) {
        let schema = schema();
        let layout = plain_layout(vec![]);
        let query = ListQuery { sort_field: Some(field), ..ListQuery::default() };
        let view = render_list(&records, &schema, Some(&layout), &query);
        let ids = row_ids(&view);
        prop_assert_eq!(ids.len(), records.len());

        let position = |id: &str| records.iter().position(|record| record.id.as_str() == id).unwrap_or(usize::MAX);
        let key = |id: &str| string_repr(records[position(id)].value(field)).into_owned();
        for pair in ids.windows(2) {
            let (left, right) = (key(&pair[0]), key(&pair[1]));
            prop_assert!(left <= right);
            if left == right {
                prop_assert!(position(&pair[0]) < position(&pair[1]));
            }
        }
    }

    #[test]
    fn prop_list_columns_are_schema_fields(columns in prop::collection::vec("[a-z]{1,6}", 0..6)) {
        let schema = schema();
        let layout = plain_layout(columns.clone());
        let view = render_list(&[], &schema, Some(&layout), &ListQuery::default());
        for column in view.columns() {
            prop_assert!(schema.field(&column.name).is_some());
            prop_assert!(columns.is_empty() || columns.contains(&column.name));
        }
    }

    #[test]
    fn prop_tabs_have_exactly_one_active(section_count in 2usize..6, requested in prop::option::of("[a-z0-9-]{0,10}")) {
        let layout = ResolvedLayout::new(
            Layout {
                layout_mode: Some(LayoutMode::Tabs),
                sections: (0..section_count).map(|_| Section::default()).collect(),
                list_config: None,
            },
            LayoutStage::Published,
        );
        let view = render_detail(&Record::new("r"), &schema(), &layout, requested.as_deref());
        let DetailBody::Tabbed { tabs, active } = view.body else {
            panic!("two or more sections in tabs mode render tabbed");
        };
        let active_tabs: Vec<_> = tabs.iter().filter(|tab| tab.active).collect();
        prop_assert_eq!(active_tabs.len(), 1);
        prop_assert_eq!(&active_tabs[0].section_id, &active.id);
    }

    #[test]
    fn prop_escaped_text_has_no_markup(input in ".{0,40}") {
        let escaped = escape_html(&input);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
    }

    #[test]
    fn prop_menu_stays_on_screen_when_it_fits(
        trigger_x in 0i32..90,
        trigger_y in 0i32..39,
        menu_height in 1i32..10,
    ) {
        let viewport = Bounds::new(0, 0, 100, 40);
        let trigger = Bounds::new(trigger_x, trigger_y, 3, 1);
        let placement = place_menu(trigger, 16, menu_height, viewport, 0);
        prop_assert!(placement.bounds.x >= 0);
        if trigger.right() >= 16 {
            prop_assert_eq!(placement.bounds.right(), trigger.right());
        }
        if !placement.flipped {
            prop_assert!(placement.bounds.bottom() <= viewport.bottom());
            prop_assert_eq!(placement.bounds.y, trigger.bottom());
        } else {
            prop_assert!(placement.bounds.y <= trigger.y);
        }
    }

    #[test]
    fn prop_date_format_is_idempotent(
        stored in stored_date_strategy(),
        field_type in prop::sample::select(vec![FieldType::Date, FieldType::DateTime]),
        context in prop::sample::select(vec![FormatContext::List, FormatContext::Detail]),
    ) {
        let once = format_value(Some(&stored), field_type, context);
        let twice = format_value(Some(&Value::String(once.clone())), field_type, context);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_single_section_tabs_stack(section_count in 0usize..=1, requested in prop::option::of("[a-z0-9-]{0,10}")) {
        let layout = ResolvedLayout::new(
            Layout {
                layout_mode: Some(LayoutMode::Tabs),
                sections: (0..section_count)
                    .map(|_| Section {
                        columns: vec![Column { blocks: vec![Block::field("name")] }],
                        ..Section::default()
                    })
                    .collect(),
                list_config: None,
            },
            LayoutStage::Published,
        );
        prop_assert_eq!(layout.presentation(), Presentation::Stacked);

        let view = render_detail(&Record::new("r").with_value("name", "n"), &schema(), &layout, requested.as_deref());
        let html = render_detail_html(&view);
        let DetailBody::Stacked(sections) = view.body else {
            panic!("tabs with at most one section render stacked");
        };
        prop_assert_eq!(sections.len(), section_count);
        prop_assert!(!html.contains("tablist"));
    }
}
