use super::*;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> Track {
    Track {
        path: PathBuf::from("/tmp/music/test.mp3"),
        title: "Test Title".to_string(),
        artist: Some("Test Artist".to_string()),
        album: Some("Test Album".to_string()),
        duration: Some(Duration::from_micros(1_234_567)),
        art: None,
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, _notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };

    let track = make_track();
    handle.set_track_metadata(Some(&track));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert!(s.url.as_deref().unwrap().contains("/tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/0")
        );
    }

    handle.set_track_metadata(None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_phases_onto_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    let cases = [
        (PlaybackState::Idle, "Stopped"),
        (PlaybackState::Loading, "Paused"),
        (PlaybackState::Paused, "Paused"),
        (PlaybackState::Playing, "Playing"),
        (PlaybackState::Ended, "Stopped"),
    ];
    for (phase, expected) in cases {
        {
            let mut s = state.lock().unwrap();
            s.playback = phase;
        }
        assert_eq!(iface.playback_status(), expected, "phase {phase:?}");
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.artist = vec!["Artist".to_string()];
        s.album = Some("Album".to_string());
        s.url = Some("file:///tmp/test.mp3".to_string());
        s.length_micros = Some(42);
        s.track_id = ObjectPath::try_from(TRACK_OBJECT_PATH).ok();
    }

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_when_nothing_announced() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert!(iface.metadata().is_empty());
}

#[test]
fn set_position_ignores_mismatched_track_ids() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    {
        let mut s = state.lock().unwrap();
        s.track_id = ObjectPath::try_from(TRACK_OBJECT_PATH).ok();
    }
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.set_position(ObjectPath::try_from("/some/other/track").unwrap(), 5);
    assert!(rx.try_recv().is_err());

    iface.set_position(ObjectPath::try_from(TRACK_OBJECT_PATH).unwrap(), 5_000_000);
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::SetPosition(5_000_000))));
}

#[test]
fn volume_writes_are_clamped_into_unit_range() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.set_volume(1.7);
    match rx.try_recv() {
        Ok(ControlCmd::SetVolume(v)) => assert!((v - 1.0).abs() < 1e-9),
        other => panic!("unexpected command: {other:?}"),
    }

    iface.set_volume(-0.3);
    match rx.try_recv() {
        Ok(ControlCmd::SetVolume(v)) => assert!(v.abs() < 1e-9),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn loop_status_round_trips_through_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.loop_status(), "None");

    iface.set_loop_status("Track");
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::SetLoopOne(true))));

    // Playlist looping is not supported; anything but Track means off.
    iface.set_loop_status("Playlist");
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::SetLoopOne(false))));

    {
        let mut s = state.lock().unwrap();
        s.loop_one = true;
    }
    assert_eq!(iface.loop_status(), "Track");
}
