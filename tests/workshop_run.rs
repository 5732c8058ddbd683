use std::collections::BTreeMap;
use std::sync::Arc;

use santa_workshop::{
    Action, Config, ConfigError, MemorySink, Pace, Subscribe, Supervisor, SupervisorConfig,
    Tally, WorkerId,
};

fn quiet() -> SupervisorConfig {
    SupervisorConfig {
        handle_signals: false,
        ..SupervisorConfig::default()
    }
}

fn parse(contents: &str) -> Vec<Action> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let (n, rest) = line.split_once(": ").unwrap();
            assert_eq!(n.parse::<usize>().unwrap(), i + 1);
            rest.parse().unwrap()
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn log_file_holds_a_complete_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proj2.out");
    let config = Config::from_args(&["7", "4", "3", "6"]).unwrap();

    let tally = Arc::new(Tally::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![tally.clone()];
    let sup = Supervisor::builder(quiet()).with_subscribers(subs).build();

    let file = std::fs::File::create(&path).unwrap();
    let report = sup.run(config, Box::new(file)).await.unwrap();

    let actions = parse(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(report.actions, actions.len() as u64);
    assert_eq!(report.finished, 12);
    assert_eq!(tally.total().await, report.actions);
    assert_eq!(tally.dropped().await, 0);

    let releases = tally.releases().await;
    let helping = actions.iter().filter(|a| **a == Action::SantaHelping).count();
    assert_eq!(releases.len(), helping + 1);
    assert_eq!(releases.last().map(|(cause, _)| cause.as_str()), Some("closure"));
    let handed_out: u64 = releases.iter().map(|(_, n)| n).sum();
    assert_eq!(tally.claimed().await, handed_out);
    assert!(!tally.overdrawn().await);

    let mut by_worker: BTreeMap<WorkerId, Vec<Action>> = BTreeMap::new();
    for a in &actions {
        by_worker.entry(a.worker()).or_default().push(*a);
    }
    for id in 1..=4 {
        assert_eq!(
            by_worker[&WorkerId::Reindeer(id)],
            vec![
                Action::ReindeerStarted(id),
                Action::ReindeerHome(id),
                Action::ReindeerHitched(id),
            ]
        );
    }
    for id in 1..=7 {
        let elf = &by_worker[&WorkerId::Elf(id)];
        assert_eq!(elf.first(), Some(&Action::ElfStarted(id)));
        assert_eq!(elf.last(), Some(&Action::ElfHolidays(id)));
    }
    assert_eq!(
        by_worker[&WorkerId::Santa].last(),
        Some(&Action::ChristmasStarted)
    );
}

#[tokio::test]
async fn one_supervisor_runs_twice() {
    let sup = Supervisor::builder(quiet())
        .with_pace(Arc::new(Pace::exact()))
        .build();
    let config = Config::new(3, 1, 0, 0).unwrap();

    for _ in 0..2 {
        let sink = MemorySink::new();
        sup.run(config, Box::new(sink.clone())).await.unwrap();
        let actions = parse(&sink.contents());
        assert!(!actions.iter().any(|a| matches!(a, Action::ElfGetHelp(_))));
        assert_eq!(
            actions.iter().filter(|a| **a == Action::ChristmasStarted).count(),
            1
        );
    }
}

#[test]
fn bad_arguments_are_rejected_before_running() {
    assert!(matches!(
        Config::from_args(&["3", "20", "0", "0"]),
        Err(ConfigError::OutOfRange { field: "reindeer_count", .. })
    ));
    assert!(matches!(
        Config::from_args(&["3", "-1", "0", "0"]),
        Err(ConfigError::Invalid { .. })
    ));
    assert!(matches!(
        Config::from_args(&["3", "1", "0"]),
        Err(ConfigError::MissingArgument { field: "reindeer_holiday_ms" })
    ));
}
