use appstore_eda::data::schema::*;
use appstore_eda::data::values::{float_values, string_values};
use appstore_eda::data::DataCleaner;
use appstore_eda::stats::aggregator::{APP_COUNT, PERCENTAGE_PAID, RELEASE_YEAR};
use appstore_eda::stats::Aggregator;
use appstore_eda::AnalysisConfig;
use polars::prelude::*;

struct Listing {
    name: &'static str,
    released: &'static str,
    genre: &'static str,
    price: f64,
    developer: &'static str,
    reviews: f64,
    rating: Option<f64>,
}

fn listing(name: &'static str, released: &'static str, genre: &'static str, price: f64) -> Listing {
    Listing {
        name,
        released,
        genre,
        price,
        developer: "Dev",
        reviews: 1.0,
        rating: Some(4.0),
    }
}

fn listing_frame(rows: &[Listing]) -> DataFrame {
    df!(
        APP_ID => rows.iter().enumerate().map(|(i, _)| format!("id{i}")).collect::<Vec<_>>(),
        APP_NAME => rows.iter().map(|r| r.name).collect::<Vec<_>>(),
        RELEASED => rows.iter().map(|r| r.released).collect::<Vec<_>>(),
        SIZE_BYTES => rows.iter().map(|_| Some(1000.0)).collect::<Vec<_>>(),
        PRICE => rows.iter().map(|r| r.price).collect::<Vec<_>>(),
        FREE => rows.iter().map(|r| r.price == 0.0).collect::<Vec<_>>(),
        DEVELOPER_URL => rows.iter().map(|_| None::<&str>).collect::<Vec<_>>(),
        DEVELOPER_WEBSITE => rows.iter().map(|_| None::<&str>).collect::<Vec<_>>(),
        PRIMARY_GENRE => rows.iter().map(|r| r.genre).collect::<Vec<_>>(),
        CONTENT_RATING => rows.iter().map(|_| "4+").collect::<Vec<_>>(),
        CURRENCY => rows.iter().map(|_| "USD").collect::<Vec<_>>(),
        DEVELOPER => rows.iter().map(|r| r.developer).collect::<Vec<_>>(),
        REVIEWS => rows.iter().map(|r| r.reviews).collect::<Vec<_>>(),
        AVERAGE_USER_RATING => rows.iter().map(|r| r.rating).collect::<Vec<_>>(),
    )
    .unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    string_values(df, name)
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

#[test]
fn percent_paid_for_games() {
    let rows: Vec<Listing> = (0..10)
        .map(|i| {
            let mut l = listing("app", "2020-01-01", "Games", if i < 3 { 0.99 } else { 0.0 });
            l.reviews = i as f64;
            l
        })
        .collect();
    let cleaned = DataCleaner::clean(listing_frame(&rows)).unwrap();
    let config = AnalysisConfig::default();

    let out = Aggregator::new(&cleaned.frame, &config)
        .unwrap()
        .percent_paid_per_genre()
        .unwrap();
    assert_eq!(strings(&out, PRIMARY_GENRE), vec!["Games"]);
    assert_eq!(float_values(&out, PERCENTAGE_PAID).unwrap(), vec![Some(30.0)]);
}

#[test]
fn percent_paid_sorted_descending() {
    let rows = vec![
        listing("a", "2020-01-01", "Books", 0.0),
        listing("b", "2020-01-01", "Books", 1.0),
        listing("c", "2020-01-01", "Tools", 1.0),
        listing("d", "2020-01-01", "Games", 0.0),
    ];
    let cleaned = DataCleaner::clean(listing_frame(&rows)).unwrap();
    let config = AnalysisConfig::default();

    let out = Aggregator::new(&cleaned.frame, &config)
        .unwrap()
        .percent_paid_per_genre()
        .unwrap();
    assert_eq!(strings(&out, PRIMARY_GENRE), vec!["Tools", "Books", "Games"]);
    assert_eq!(
        float_values(&out, PERCENTAGE_PAID).unwrap(),
        vec![Some(100.0), Some(50.0), Some(0.0)]
    );
}

#[test]
fn top_genre_per_year_picks_largest_count() {
    let mut rows = Vec::new();
    for i in 0..5 {
        rows.push(listing("g", "2020-03-01T10:00:00Z", "Games", i as f64));
    }
    for i in 0..7 {
        rows.push(listing("t", "2020-04-01T10:00:00Z", "Tools", i as f64));
    }
    rows.push(listing("b", "2019-04-01T10:00:00Z", "Books", 0.0));

    let cleaned = DataCleaner::clean(listing_frame(&rows)).unwrap();
    let config = AnalysisConfig::default();
    let out = Aggregator::new(&cleaned.frame, &config)
        .unwrap()
        .top_genre_per_year()
        .unwrap();

    let years: Vec<Option<i32>> = out
        .column(RELEASE_YEAR)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(years, vec![Some(2019), Some(2020)]);
    assert_eq!(strings(&out, PRIMARY_GENRE), vec!["Books", "Tools"]);
    assert_eq!(
        float_values(&out, APP_COUNT).unwrap(),
        vec![Some(1.0), Some(7.0)]
    );
}

#[test]
fn developer_rating_rank_requires_min_apps() {
    let mut rows = Vec::new();
    for i in 0..5 {
        let mut l = listing("x", "2020-01-01", "Games", i as f64);
        l.developer = "Prolific";
        l.rating = Some(4.0);
        rows.push(l);
    }
    for i in 0..4 {
        let mut l = listing("y", "2020-01-01", "Games", i as f64);
        l.developer = "Newcomer";
        l.rating = Some(5.0);
        rows.push(l);
    }

    let cleaned = DataCleaner::clean(listing_frame(&rows)).unwrap();
    let config = AnalysisConfig::default();
    let agg = Aggregator::new(&cleaned.frame, &config).unwrap();

    let by_rating = agg.top_developers_by_rating().unwrap();
    assert_eq!(strings(&by_rating, DEVELOPER), vec!["Prolific"]);

    let relaxed = AnalysisConfig {
        min_apps_for_rating_rank: 4,
        ..Default::default()
    };
    let by_rating = Aggregator::new(&cleaned.frame, &relaxed)
        .unwrap()
        .top_developers_by_rating()
        .unwrap();
    assert_eq!(strings(&by_rating, DEVELOPER), vec!["Newcomer", "Prolific"]);
}

#[test]
fn category_codes_are_consistent_per_value() {
    let rows = vec![
        listing("a", "2020-01-01", "Tools", 0.0),
        listing("b", "2020-01-01", "Books", 0.0),
        listing("c", "2020-01-01", "Tools", 1.0),
    ];
    let cleaned = DataCleaner::clean(listing_frame(&rows)).unwrap();
    let codes = &cleaned.encodings[PRIMARY_GENRE];

    let encoded: Vec<Option<i32>> = cleaned
        .frame
        .column(&code_column(PRIMARY_GENRE))
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(encoded, vec![Some(1), Some(0), Some(1)]);
    assert_eq!(codes.decode(0), Some("Books"));
    assert_eq!(codes.decode(1), Some("Tools"));
}

#[test]
fn cleaning_never_adds_rows() {
    let rows = vec![
        listing("same", "2020-01-01", "Games", 0.0),
        listing("same", "2020-01-01", "Games", 0.0),
        listing("other", "2020-01-01", "Games", 0.0),
    ];
    let frame = listing_frame(&rows);
    let before = frame.height();

    // Ids differ, so these rows are not full duplicates.
    let cleaned = DataCleaner::clean(frame).unwrap();
    assert!(cleaned.frame.height() <= before);
    assert_eq!(cleaned.summary.duplicates_removed, 0);

    let titled = strings(&cleaned.frame, APP_NAME);
    assert_eq!(titled, vec!["Same", "Same", "Other"]);
}
