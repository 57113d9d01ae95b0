// End-to-end checks through the public API
use attendance_engine::{
    Analyzer, AttendanceAction, CalendarDate, Comment, DateCatalog, DateFilterState,
    DateTokenParser, EngineConfig, TagDate,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn analyzer() -> Analyzer {
    init_logging();
    Analyzer::new(EngineConfig::new().with_reference_year(2023)).unwrap()
}

fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

#[test]
fn parses_short_tokens_against_reference_year() {
    let parser = DateTokenParser::with_year(2023);
    assert_eq!(parser.parse("5.2").unwrap().to_string(), "2023-05-02");
    assert!(parser.parse("13.5").is_err());
    assert!(parser.parse("abc").is_err());
}

#[test]
fn extracts_tag_with_names() {
    let tags = analyzer().extract("5.2 @참석 철수, 영희. 감사합니다", "작성자");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].date, TagDate::Explicit(date("2023-05-02")));
    assert_eq!(tags[0].action, AttendanceAction::Attend);
    assert_eq!(tags[0].names, vec!["철수", "영희"]);
}

#[test]
fn later_cancel_overrides_attend() {
    let book = analyzer().resolve(&[
        Comment::new("a", "", "5.1 @참석 철수."),
        Comment::new("b", "", "5.1 @취소 철수."),
    ]);
    assert_eq!(
        book.get("철수", &date("2023-05-01")).unwrap().status,
        AttendanceAction::Cancel
    );
}

#[test]
fn self_reference_resolves_to_author() {
    let book = analyzer().resolve(&[Comment::new("민수", "", "5.3 @참석 본인.")]);
    assert_eq!(
        book.get("민수", &date("2023-05-03")).unwrap().status,
        AttendanceAction::Attend
    );
}

#[test]
fn filter_scopes_summary() {
    let analyzer = analyzer();
    let comments = [
        Comment::new("a", "", "5.1 @참석 철수."),
        Comment::new("b", "", "5.2 @참석 영희."),
    ];
    let filter: DateFilterState = [date("2023-05-01")].into_iter().collect();
    let summary = analyzer.analyze(&comments, &filter);

    assert_eq!(summary.sorted_counts(), vec![(date("2023-05-01"), 1)]);
    assert_eq!(summary.count_for(&date("2023-05-02")), None);
}

#[test]
fn resolve_twice_is_identical() {
    let analyzer = analyzer();
    let comments = [
        Comment::new("a", "2023-04-30T00:00:00Z", "5.1 @참석 철수, 영희."),
        Comment::new("b", "2023-04-30T01:00:00Z", "5.1 @취소 영희."),
        Comment::new("c", "2023-04-30T02:00:00Z", "저도 참가요"),
    ];
    assert_eq!(analyzer.resolve(&comments), analyzer.resolve(&comments));
}

#[test]
fn empty_filter_differs_from_zero_attendees() {
    let analyzer = analyzer();

    let nothing = analyzer.analyze(&[], &DateFilterState::new());
    assert!(nothing.nothing_selected());
    assert!(nothing.counts.is_empty());

    let filter: DateFilterState = [date("2023-05-01")].into_iter().collect();
    let zero = analyzer.analyze(&[], &filter);
    assert!(!zero.nothing_selected());
    assert_eq!(zero.count_for(&date("2023-05-01")), Some(0));
}

#[test]
fn catalog_drives_export() {
    let analyzer = analyzer();
    let comments = [
        Comment::new("민수", "2023-04-28T09:00:00Z", "5.1 @참석 본인, 철수. 5.8 @참석 영희."),
        Comment::new("영희", "2023-04-29T09:00:00Z", "5.8 @취소 본인."),
        Comment::new("지수", "2023-05-08T09:00:00Z", "참석합니다"),
    ];

    let mut catalog = DateCatalog::new();
    catalog.add_date(date("2023-05-01"), true);
    catalog.add_date(date("2023-05-08"), true);

    let summary = analyzer.analyze(&comments, catalog.filter());
    assert_eq!(summary.export_text(), "2023-05-01 : 민수, 철수\n2023-05-08 : 지수");

    // Unchecking a date only narrows what is reported
    catalog.set_checked(date("2023-05-08"), false);
    let summary = analyzer.analyze(&comments, catalog.filter());
    assert_eq!(summary.export_text(), "2023-05-01 : 민수, 철수");
}
