use anyhow::Result;
use std::path::Path;
use std::sync::{Arc, Mutex};

use memovox::audio::PlaybackDevice;
use memovox::config::Settings;
use memovox::session::{PlayerController, PlayerState};
use memovox::MemovoxError;

#[derive(Default)]
struct Inner {
    duration_ms: u64,
    position_ms: u64,
    playing: bool,
    fail_load: bool,
    seeks: Vec<u64>,
}

/// Scripted playback device. Tests hold a second handle to the shared
/// state so they can move the position and stop playback behind the
/// controller's back, the way a real device does.
#[derive(Clone)]
struct FakePlayback {
    inner: Arc<Mutex<Inner>>,
}

impl FakePlayback {
    fn with_duration(duration_ms: u64) -> (Self, Arc<Mutex<Inner>>) {
        let inner = Arc::new(Mutex::new(Inner {
            duration_ms,
            ..Inner::default()
        }));
        (
            Self {
                inner: inner.clone(),
            },
            inner,
        )
    }

    fn failing() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                fail_load: true,
                ..Inner::default()
            })),
        }
    }
}

impl PlaybackDevice for FakePlayback {
    fn load(&mut self, _path: &Path) -> anyhow::Result<()> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_load {
            anyhow::bail!("unsupported container");
        }
        Ok(())
    }

    fn duration_ms(&self) -> u64 {
        self.inner.lock().unwrap().duration_ms
    }

    fn position_ms(&self) -> u64 {
        self.inner.lock().unwrap().position_ms
    }

    fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }

    fn play(&mut self) {
        self.inner.lock().unwrap().playing = true;
    }

    fn pause(&mut self) {
        self.inner.lock().unwrap().playing = false;
    }

    fn seek_to_ms(&mut self, position_ms: u64) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.position_ms = position_ms;
        inner.seeks.push(position_ms);
        Ok(())
    }
}

fn loaded_player(duration_ms: u64) -> (PlayerController<FakePlayback>, Arc<Mutex<Inner>>) {
    let settings = Settings::default();
    let (device, inner) = FakePlayback::with_duration(duration_ms);
    let mut player = PlayerController::new(device, &settings);
    player
        .load(Path::new("memo.wav"))
        .expect("load scripted source");
    (player, inner)
}

#[test]
fn load_attaches_source_and_pauses() {
    let (player, _) = loaded_player(30_000);

    assert_eq!(player.state(), PlayerState::Paused);
    assert_eq!(player.duration_ms(), 30_000);
    assert_eq!(player.position_ms(), 0);
    assert_eq!(player.progress(), 0.0);
}

#[test]
fn load_failure_stays_idle_and_play_errors() {
    let settings = Settings::default();
    let mut player = PlayerController::new(FakePlayback::failing(), &settings);

    assert!(matches!(
        player.load(Path::new("memo.wav")),
        Err(MemovoxError::Playback(_))
    ));
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(matches!(
        player.play(),
        Err(MemovoxError::InvalidTransition(_))
    ));
    assert!(matches!(
        player.seek_to_ms(1000),
        Err(MemovoxError::InvalidTransition(_))
    ));
}

#[test]
fn zero_length_source_gets_a_one_ms_floor() {
    let (player, _) = loaded_player(0);

    assert_eq!(player.duration_ms(), 1);
    assert_eq!(player.progress(), 0.0);
}

#[test]
fn poll_tracks_the_device_position_while_playing() -> Result<()> {
    let (mut player, inner) = loaded_player(10_000);

    player.play()?;
    assert_eq!(player.state(), PlayerState::Playing);

    inner.lock().unwrap().position_ms = 2_500;
    player.poll();
    assert_eq!(player.position_ms(), 2_500);
    assert_eq!(player.progress(), 0.25);

    Ok(())
}

#[test]
fn poll_does_nothing_while_paused() -> Result<()> {
    let (mut player, inner) = loaded_player(10_000);

    player.play()?;
    inner.lock().unwrap().position_ms = 1_000;
    player.poll();
    player.pause();

    inner.lock().unwrap().position_ms = 9_000;
    player.poll();
    assert_eq!(player.position_ms(), 1_000);

    Ok(())
}

#[test]
fn end_of_track_clamps_position_and_pauses() -> Result<()> {
    let (mut player, inner) = loaded_player(10_000);

    player.play()?;
    {
        let mut inner = inner.lock().unwrap();
        // Decoder overshoots slightly before the sink drains
        inner.position_ms = 10_040;
        inner.playing = false;
    }
    player.poll();

    assert_eq!(player.state(), PlayerState::Paused);
    assert_eq!(player.position_ms(), 10_000);
    assert_eq!(player.progress(), 1.0);

    Ok(())
}

#[test]
fn seek_clamps_to_duration_and_updates_immediately() -> Result<()> {
    let (mut player, inner) = loaded_player(10_000);

    player.seek_to_ms(4_000)?;
    assert_eq!(player.position_ms(), 4_000);

    player.seek_to_ms(99_999)?;
    assert_eq!(player.position_ms(), 10_000);

    // The device only ever saw clamped positions
    assert_eq!(inner.lock().unwrap().seeks, vec![4_000, 10_000]);

    Ok(())
}

#[test]
fn fraction_seek_clamps_to_unit_interval() -> Result<()> {
    let (mut player, _) = loaded_player(10_000);

    player.seek_to_fraction(0.5)?;
    assert_eq!(player.position_ms(), 5_000);

    player.seek_to_fraction(2.0)?;
    assert_eq!(player.position_ms(), 10_000);

    player.seek_to_fraction(-1.0)?;
    assert_eq!(player.position_ms(), 0);

    Ok(())
}

#[test]
fn step_seeks_saturate_at_both_ends() -> Result<()> {
    let (mut player, _) = loaded_player(12_000);
    let settings = Settings::default();
    assert_eq!(settings.playback.seek_step_ms, 5_000);

    // Back from the start stays at 0
    player.step_back()?;
    assert_eq!(player.position_ms(), 0);

    player.step_forward()?;
    assert_eq!(player.position_ms(), 5_000);
    player.step_forward()?;
    assert_eq!(player.position_ms(), 10_000);
    // Forward past the end clamps to the duration
    player.step_forward()?;
    assert_eq!(player.position_ms(), 12_000);

    player.step_back()?;
    assert_eq!(player.position_ms(), 7_000);

    Ok(())
}

#[test]
fn amplitudes_arrive_after_load_and_reset_on_reload() -> Result<()> {
    let (mut player, _) = loaded_player(10_000);

    assert!(player.amplitudes().is_none());
    player.set_amplitudes(vec![1, 2, 3]);
    assert_eq!(player.amplitudes(), Some(&[1, 2, 3][..]));

    player.load(Path::new("other.wav"))?;
    assert!(player.amplitudes().is_none());

    Ok(())
}
