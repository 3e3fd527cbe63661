//! Collaborators around shared documents.

use std::time::Duration;

use indexmap::IndexMap;
use paramtree::{
    Config,
    config::{DumpOptions, LoadPolicy},
    util::{
        FileLock, LockOptions, Singleton,
        naming::{create_folder, name_and_iter_to_filename, random_string},
        params::merge_named,
    },
};

#[test]
fn test_locked_read_modify_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.json");
    let name = path.display().to_string();

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let path = path.clone();
            let name = name.clone();
            std::thread::spawn(move || {
                let _lock = FileLock::acquire(
                    &name,
                    LockOptions {
                        timeout: Duration::from_secs(10),
                        poll_interval: Duration::from_millis(5),
                    },
                )
                .unwrap();
                let mut config = Config::new();
                config.load(&path, LoadPolicy::Lenient).unwrap();
                config.set(&format!("writer{i}"), i).unwrap();
                config.dump(&path, DumpOptions::default()).unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let mut config = Config::new();
    config.load(&path, LoadPolicy::Strict).unwrap();
    assert_eq!(config.len(), 4);
}

#[test]
fn test_lock_timeout_is_reported() {
    let name = format!("paramtree-it-timeout-{}", random_string(8));
    let _held = FileLock::acquire(&name, LockOptions::default()).unwrap();
    let err = FileLock::acquire(&name, LockOptions::with_timeout(Duration::from_millis(30)))
        .map_err(paramtree::Error::from)
        .unwrap_err();
    assert!(err.is_timeout_error());
    assert_eq!(err.module(), "util");
}

#[test]
fn test_checkpoint_names() {
    let dir = tempfile::tempdir().unwrap();
    let run_dir = dir.path().join(format!("run-{}", random_string(6)));
    assert!(create_folder(&run_dir).unwrap());

    let file = run_dir.join(name_and_iter_to_filename("checkpoint", 120, ".json", false));
    assert!(file.ends_with("checkpoint_00120.json"));
}

#[test]
fn test_merge_named_reports_mismatches() {
    let mut target: IndexMap<String, Vec<f32>> = IndexMap::new();
    target.insert("encoder.weight".into(), vec![0.0; 2]);
    target.insert("decoder.weight".into(), vec![0.0; 2]);
    let mut update = IndexMap::new();
    update.insert("encoder.weight".to_string(), vec![1.0, 2.0]);
    update.insert("classifier.bias".to_string(), vec![3.0]);

    let report = merge_named(&mut target, &update, &[]);
    assert_eq!(target["encoder.weight"], [1.0, 2.0]);
    assert_eq!(report.unused, ["classifier.bias"]);
    assert_eq!(report.not_updated, ["decoder.weight"]);
}

#[test]
fn test_singleton_shared_across_threads() {
    static SEED: Singleton<String> = Singleton::new();
    let seeds: Vec<String> = (0..4)
        .map(|_| std::thread::spawn(|| SEED.get_or_init(|| random_string(12)).clone()))
        .map(|handle| handle.join().unwrap())
        .collect();
    assert!(seeds.iter().all(|seed| seed == &seeds[0]));
}
