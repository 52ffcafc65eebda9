mod support;

use clap::Parser;
use serde_json::Value;
use std::{fs::read_to_string, path::Path, time::Duration};
use support::{comment, post, FakeReddit};
use urs::{
    cli::{Args, CommentsRequest, RedditorRequest, SubredditRequest},
    export::Layout,
    live::{stream, LiveItems, LiveTarget, Livestream},
    reddit::{existence, validate_user, Category, Data, ObjectKind, TimeFilter},
    scrapers::{run_basic, run_comments, run_redditors, run_subreddits, Console, SubredditOptions},
    Config, Run, Urs, UrsError,
};

fn rust_fake() -> FakeReddit {
    FakeReddit::default().with_subreddit(
        "rust",
        vec![
            post("p1", "Async closures are stable", "finally"),
            post("p2", "Borrow checker tips", ""),
            post("p3", "Cargo workspaces", "how do you organise them"),
        ],
    )
}

fn read_json(path: &Path) -> Value {
    Value::restore(path).unwrap()
}

fn hot(subreddit: &str, n: u32) -> SubredditRequest {
    SubredditRequest {
        subreddit: subreddit.to_string(),
        category: Category::Hot,
        n_results: n,
        time_filter: None,
    }
}

#[test]
fn validate_user_reports_rejected_credentials() {
    assert!(validate_user(&FakeReddit::default()).is_ok());

    let fake = FakeReddit {
        reject_login: true,
        ..Default::default()
    };
    assert!(matches!(validate_user(&fake), Err(UrsError::InvalidCredentials(_))));
}

#[test]
fn existence_partitions_and_fails_when_nothing_is_left() {
    let fake = rust_fake();
    let (valid, invalid) = existence(&fake, ["rust", "nope"], ObjectKind::Subreddit).unwrap();
    assert_eq!(valid, vec!["rust"]);
    assert_eq!(invalid, vec!["nope"]);

    match existence(&fake, ["nope"], ObjectKind::Redditor) {
        Err(UrsError::NothingToScrape { kind, rejected }) => {
            assert_eq!(kind, "redditors");
            assert_eq!(rejected, vec!["nope"]);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn existence_propagates_server_errors() {
    let fake = FakeReddit {
        outage: true,
        ..rust_fake()
    };
    match existence(&fake, ["rust", "nope"], ObjectKind::Subreddit) {
        Err(UrsError::Reddit { message, .. }) => assert!(message.contains("503")),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(fake.calls(), vec!["subreddit_about:rust"]);

    let fake = FakeReddit {
        outage: true,
        ..Default::default()
    };
    assert!(matches!(
        existence(&fake, ["ferris"], ObjectKind::Redditor),
        Err(UrsError::Reddit { .. })
    ));
}

#[test]
fn subreddit_scrape_exports_posts_and_about() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let fake = rust_fake();
    let mut console = Console::scripted("");

    let outputs = run_subreddits(
        &fake,
        &layout,
        &mut console,
        &[hot("rust", 2), hot("missing", 5)],
        SubredditOptions {
            include_about: true,
            skip_confirmation: true,
        },
    )
    .unwrap();

    assert_eq!(outputs, vec![dir.path().join("2026-10-16/subreddits/rust-hot-2.json")]);
    let json = read_json(&outputs[0]);
    assert_eq!(json["scrape_settings"]["category"], "hot");
    assert_eq!(json["scrape_settings"]["n_results"], 2);
    assert_eq!(json["data"]["about"]["subscribers"], 1234);
    assert_eq!(json["data"]["submissions"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["submissions"][1]["title"], "Borrow checker tips");
    assert!(!fake.calls().iter().any(|call| call.starts_with("subreddit_posts:missing")));
}

#[test]
fn declining_confirmation_scrapes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let fake = rust_fake();
    let mut console = Console::scripted("n\n");

    let outputs = run_subreddits(&fake, &layout, &mut console, &[hot("rust", 1)], SubredditOptions::default()).unwrap();
    assert!(outputs.is_empty());
    assert!(!fake.calls().iter().any(|call| call.starts_with("subreddit_posts")));
}

#[test]
fn redditor_scrape_exports_profile_and_activity() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let fake = FakeReddit::default().with_redditor(
        "ferris",
        vec![post("p1", "Hello", ""), post("p2", "World", "")],
        vec![comment("c1", "first", vec![]), comment("c2", "second", vec![])],
    );

    let outputs = run_redditors(
        &fake,
        &layout,
        &[
            RedditorRequest {
                redditor: "ferris".into(),
                n_results: 1,
            },
            RedditorRequest {
                redditor: "ghost".into(),
                n_results: 1,
            },
        ],
    )
    .unwrap();

    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].ends_with("redditors/ferris-1.json"));
    let json = read_json(&outputs[0]);
    assert_eq!(json["data"]["information"]["comment_karma"], 20);
    assert_eq!(json["data"]["submissions"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["comments"][0]["body"], "first");
}

#[test]
fn comments_scrape_keeps_the_reply_tree() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let fake = FakeReddit::default().with_thread(
        "abc123",
        vec![
            comment("c1", "top", vec![comment("c2", "reply", vec![comment("c3", "nested", vec![])])]),
            comment("c4", "another", vec![]),
        ],
    );

    let outputs = run_comments(
        &fake,
        &layout,
        &[CommentsRequest {
            url: "https://www.reddit.com/r/rust/comments/abc123/title/".into(),
            subreddit: "rust".into(),
            id: "abc123".into(),
            n_results: None,
        }],
    )
    .unwrap();

    assert!(outputs[0].ends_with("comments/rust-abc123-all.json"));
    let json = read_json(&outputs[0]);
    assert_eq!(json["scrape_settings"]["n_results"], Value::Null);
    assert_eq!(json["data"]["total_comments"], 4);
    assert_eq!(json["data"]["comments"][0]["replies"][0]["replies"][0]["body"], "nested");
}

#[test]
fn basic_scraper_reprompts_until_answers_are_valid() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let fake = rust_fake();
    let mut console = Console::scripted("\nrust nope\nx\nt\nfortnight\nweek\nzero\n3\n");

    let outputs = run_basic(&fake, &layout, &mut console).unwrap();
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].ends_with("subreddits/rust-top-3-week.json"));
    let json = read_json(&outputs[0]);
    assert_eq!(json["scrape_settings"]["time_filter"], "week");
    assert!(fake.calls().contains(&"subreddit_posts:rust:top:3".to_string()));
}

#[test]
fn basic_scraper_cancels_on_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let mut console = Console::scripted("rust\nh\n");
    assert!(matches!(
        run_basic(&rust_fake(), &layout, &mut console),
        Err(UrsError::Cancelled)
    ));
}

#[test]
fn livestream_polls_only_return_new_items_oldest_first() {
    let fake = FakeReddit::default();
    fake.live_comments.borrow_mut().extend([
        vec![comment("c2", "two", vec![]), comment("c1", "one", vec![])],
        vec![comment("c3", "three", vec![]), comment("c2", "two", vec![])],
    ]);

    let mut live = Livestream::new(&fake, LiveTarget::Subreddit("rust".into()), LiveItems::Comments);
    let first = live.poll().unwrap();
    let bodies: Vec<_> = first.iter().map(|c| c["body"].as_str().unwrap().to_string()).collect();
    assert_eq!(bodies, vec!["one", "two"]);

    let second = live.poll().unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0]["body"], "three");

    assert!(live.poll().unwrap().is_empty());
}

#[test]
fn livestream_writes_header_and_items_until_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let fake = rust_fake();

    let output = stream(
        &fake,
        &layout,
        LiveTarget::Subreddit("rust".into()),
        LiveItems::Submissions,
        Some(Duration::ZERO),
    )
    .unwrap();

    assert!(output.parent().unwrap().ends_with("livestream/subreddits"));
    assert_eq!(output.extension().unwrap(), "jsonl");
    let contents = read_to_string(&output).unwrap();
    let lines: Vec<Value> = contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["scrape_settings"]["items"], "submissions");
    // oldest first: the fake lists newest first
    assert_eq!(lines[1]["id"], "p3");
    assert_eq!(lines[3]["id"], "p1");
}

#[test]
fn livestream_rejects_unknown_targets() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::for_date(dir.path(), "2026-10-16");
    let result = stream(
        &FakeReddit::default(),
        &layout,
        LiveTarget::Redditor("ghost".into()),
        LiveItems::Comments,
        Some(Duration::ZERO),
    );
    assert!(matches!(result, Err(UrsError::NothingToScrape { .. })));
}

#[test]
fn run_urs_scrapes_into_todays_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_lookup(|_| None).with_scrapes_dir(dir.path());
    let args = Args::try_parse_from(["urs", "-r", "rust", "h", "3", "-y"]).unwrap();

    let mut run = Run::new(&args, Urs::new(rust_fake(), config, Console::scripted("")));
    run.run_urs().unwrap();

    let today = Layout::today(dir.path());
    let output = today.date_dir().join("subreddits/rust-hot-3.json");
    assert!(output.is_file(), "missing {}", output.display());
}

#[test]
fn run_urs_builds_frequencies_from_a_previous_scrape() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_lookup(|_| None).with_scrapes_dir(dir.path());
    let scrape = dir.path().join("rust-hot-3.json");
    std::fs::write(
        &scrape,
        r#"{"scrape_settings": {}, "data": {"submissions": [{"title": "cargo cargo clippy"}]}}"#,
    )
    .unwrap();
    let args = Args::try_parse_from(["urs", "-f", scrape.to_str().unwrap()]).unwrap();

    let mut run = Run::new(&args, Urs::new(FakeReddit::default(), config, Console::scripted("")));
    run.run_urs().unwrap();

    let output = Layout::today(dir.path())
        .date_dir()
        .join("analytics/frequencies/rust-hot-3-frequencies.json");
    let json = read_json(&output);
    assert_eq!(json["data"][0]["word"], "cargo");
    assert_eq!(json["data"][0]["frequency"], 2);
}

fn scrape_with_titles(dir: &Path) -> std::path::PathBuf {
    let scrape = dir.join("rust-hot-3.json");
    std::fs::write(
        &scrape,
        r#"{"scrape_settings": {}, "data": {"submissions": [
            {"title": "cargo cargo cargo clippy", "selftext": "rustfmt clippy"},
            {"title": "borrow checker", "comments": [{"body": "cargo lifetimes"}]}
        ]}}"#,
    )
    .unwrap();
    scrape
}

fn run_wordcloud(dir: &Path, extra: &[&str]) -> std::path::PathBuf {
    let config = Config::from_lookup(|_| None).with_scrapes_dir(dir);
    let scrape = scrape_with_titles(dir);
    let argv = ["urs", "--wordcloud", scrape.to_str().unwrap()]
        .into_iter()
        .chain(extra.iter().copied());
    let args = Args::try_parse_from(argv).unwrap();

    let mut run = Run::new(&args, Urs::new(FakeReddit::default(), config, Console::scripted("")));
    run.run_urs().unwrap();
    Layout::today(dir).date_dir().join("analytics/wordcloud")
}

#[test]
fn run_urs_renders_an_svg_wordcloud() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_wordcloud(dir.path(), &["svg"]).join("rust-hot-3-wordcloud.svg");

    let svg = read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">cargo<"));
    assert!(svg.contains(">clippy<"));
}

#[test]
fn run_urs_renders_a_png_wordcloud_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_wordcloud(dir.path(), &[]).join("rust-hot-3-wordcloud.png");

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn top_requests_carry_time_filter_through_cli() {
    let args = Args::try_parse_from(["urs", "-r", "rust", "t", "2", "month"]).unwrap();
    let requests = args.subreddit_requests().unwrap();
    assert_eq!(requests[0].time_filter, Some(TimeFilter::Month));
}
