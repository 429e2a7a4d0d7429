//! End-to-end training and prediction on synthetic data.

mod common;

use jungle_rust::{classification_error, Jungle, JungleConfig, JungleTrainer};

#[test]
fn gaussian_blobs_train_below_five_percent_error() {
    common::init_logging();
    let examples = common::gaussian_blobs(800, 31);
    let config = JungleConfig::builder()
        .num_dags(8)
        .max_depth(8)
        .max_width(16)
        .seed(31)
        .build()
        .unwrap();
    let jungle = JungleTrainer::new(config).unwrap().train(&examples).unwrap();
    assert_eq!(jungle.num_dags(), 8);
    let error = classification_error(&jungle, &examples);
    assert!(error < 0.05, "training error {error} not below 5%");
}

#[test]
fn training_without_bagging_also_converges() {
    common::init_logging();
    let examples = common::gaussian_blobs(400, 7);
    let config = JungleConfig::builder()
        .num_dags(4)
        .max_depth(8)
        .max_width(16)
        .use_bagging(false)
        .seed(7)
        .build()
        .unwrap();
    let jungle = JungleTrainer::new(config).unwrap().train(&examples).unwrap();
    assert!(classification_error(&jungle, &examples) < 0.05);
}

#[test]
fn fixed_seed_gives_identical_predictions() {
    common::init_logging();
    let examples = common::gaussian_blobs(400, 19);
    let config = JungleConfig::builder()
        .num_dags(6)
        .max_depth(6)
        .max_width(8)
        .parallel(false)
        .seed(123)
        .build()
        .unwrap();
    let trainer = JungleTrainer::new(config).unwrap();
    let a = trainer.train(&examples).unwrap();
    let b = trainer.train(&examples).unwrap();
    assert_eq!(a.node_count(), b.node_count());
    for ex in &examples {
        assert_eq!(
            a.predict(ex.features()).map(|p| p.label()),
            b.predict(ex.features()).map(|p| p.label()),
        );
    }
}

#[test]
fn parallel_and_serial_seeded_runs_predict_alike() {
    common::init_logging();
    let examples = common::gaussian_blobs(400, 3);
    let base = JungleConfig::builder()
        .num_dags(4)
        .max_depth(6)
        .max_width(8)
        .seed(55);
    let parallel = base.clone().parallel(true).build().unwrap();
    let serial = base.parallel(false).build().unwrap();
    let a = JungleTrainer::new(parallel).unwrap().train(&examples).unwrap();
    let b = JungleTrainer::new(serial).unwrap().train(&examples).unwrap();
    for ex in &examples {
        assert_eq!(
            a.predict(ex.features()).map(|p| p.label()),
            b.predict(ex.features()).map(|p| p.label()),
        );
    }
}

#[test]
fn empty_jungle_predicts_none() {
    let jungle = Jungle::new();
    assert!(jungle.predict(&[0.0, 1.0]).is_none());
}

#[test]
fn narrow_jungle_still_learns() {
    // max_width 4 forces child sharing as soon as a level has more than
    // two nodes.
    common::init_logging();
    let examples = common::gaussian_blobs(400, 11);
    let config = JungleConfig::builder()
        .num_dags(8)
        .max_depth(10)
        .max_width(4)
        .seed(11)
        .build()
        .unwrap();
    let jungle = JungleTrainer::new(config).unwrap().train(&examples).unwrap();
    assert!(classification_error(&jungle, &examples) < 0.1);
}
