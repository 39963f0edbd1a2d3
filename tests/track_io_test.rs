//! Track definition files survive a save/load cycle.

use tapline::model::{Beatmap, Track, builtin_tracks};

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("festival.json");

    let track = Track {
        id: "festival".to_string(),
        name: "Festival".to_string(),
        difficulty_rating: 2,
        audio_src: "assets/bgm2.wav".to_string(),
        beatmap: Beatmap::new(vec![200, 900, 1500]).unwrap(),
        offset_ms: -40,
    };
    track.save(&path).unwrap();

    let loaded = Track::load(&path).unwrap();
    assert_eq!(loaded.id, "festival");
    assert_eq!(loaded.beatmap.beats(), &[200, 900, 1500]);
    assert_eq!(loaded.offset_ms, -40);
}

#[test]
fn offset_defaults_to_zero_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.json");
    std::fs::write(
        &path,
        r#"{"id":"m","name":"M","difficulty_rating":1,"audio_src":"","beatmap":[100,200]}"#,
    )
    .unwrap();

    let loaded = Track::load(&path).unwrap();
    assert_eq!(loaded.offset_ms, 0);
    assert_eq!(loaded.beatmap.len(), 2);
}

#[test]
fn unsorted_beatmap_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"id":"b","name":"B","difficulty_rating":1,"audio_src":"","beatmap":[500,100]}"#,
    )
    .unwrap();

    assert!(Track::load(&path).is_err());
}

#[test]
fn builtin_beatmaps_are_sorted() {
    for track in builtin_tracks() {
        let beats = track.beatmap.beats();
        assert!(beats.windows(2).all(|w| w[0] <= w[1]), "{}", track.id);
    }
}
