//! PodiumEngine: sources, configuration snapshots, gating and offline mix.

#[path = "helpers/mod.rs"]
mod helpers;

use approx::assert_abs_diff_eq;
use helpers::tolerances::*;
use helpers::{
    assert_not_silent, generate_impulse, generate_sine, mono, onset, reference_spaced_pair,
    test_engine, TEST_SAMPLE_RATE,
};
use podium::dsp::spatial::compute_render_params;
use podium::prelude::*;
use podium::SessionMicSettings;

const WAIT: Duration = Duration::from_secs(10);

// =============================================================================
// Sources
// =============================================================================

#[test]
fn test_add_move_reset_remove() {
    let engine = test_engine();
    let home = SourcePosition::new(-0.4, 0.6);
    let id = engine
        .add_source("viola", home, mono(vec![0.0; 16]), None)
        .unwrap();
    assert_eq!(engine.source_count(), 1);
    assert_eq!(engine.source_name(id).as_deref(), Some("viola"));

    engine.move_source(id, SourcePosition::new(0.5, 0.1)).unwrap();
    assert_eq!(engine.position(id), Some(SourcePosition::new(0.5, 0.1)));

    assert_eq!(engine.reset_source(id).unwrap(), home);
    assert_eq!(engine.position(id), Some(home));

    let removed = engine.remove_source(id).unwrap();
    assert_eq!(removed.name, "viola");
    assert_eq!(engine.source_count(), 0);
    assert_eq!(engine.move_source(id, home), Err(Error::UnknownSource(id)));
}

#[test]
fn test_source_rate_must_match_engine() {
    let engine = test_engine();
    let wrong = AudioBuffer::from_mono(vec![0.0; 16], 44100).unwrap();
    let err = engine
        .add_source("flute", SourcePosition::default(), wrong, None)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Core(podium::core::Error::SampleRateMismatch {
            expected: TEST_SAMPLE_RATE,
            found: 44100
        })
    );
}

#[test]
fn test_ids_are_unique() {
    let engine = test_engine();
    let a = engine.add_source("a", SourcePosition::default(), mono(vec![0.0]), None).unwrap();
    let b = engine.add_source("b", SourcePosition::default(), mono(vec![0.0]), None).unwrap();
    assert_ne!(a, b);
    assert_eq!(engine.source_ids(), vec![a, b]);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_render_params_follow_configuration_swap() {
    let engine = test_engine();
    let pos = SourcePosition::new(-0.8, 0.5);
    let id = engine.add_source("horn", pos, mono(vec![0.0; 8]), None).unwrap();

    engine.set_microphones(reference_spaced_pair());
    let live = engine.render_params(id).unwrap();
    let direct = compute_render_params(pos, &reference_spaced_pair(), &PropagationContext::default());
    assert_eq!(live, direct);
    assert!(live.response.left.gain > live.response.right.gain);

    engine.update_microphones(|mics| mics.with_technique(TechniqueId::DeccaTree));
    let decca = engine.render_params(id).unwrap();
    assert_eq!(decca.paths.len(), 3);
    assert_eq!(engine.microphones().technique, TechniqueId::DeccaTree);
}

#[test]
fn test_update_clamps_through_validation() {
    let engine = test_engine();
    engine.update_microphones(|mics| mics.with_spacing(99.0).with_mic_y(3.0));
    let mics = engine.microphones();
    assert!(mics.spacing <= 6.0);
    assert!(mics.mic_y <= -0.5);
}

#[test]
fn test_hand_edited_configuration_is_laid_out() {
    let engine = test_engine();

    let mut edited = reference_spaced_pair();
    edited.spacing = 4.0;
    engine.set_microphones(edited);
    let mics = engine.microphones();
    assert_abs_diff_eq!(mics.channel(ChannelId::Left).unwrap().offset_x, -2.0, epsilon = FLOAT_EPSILON);
    assert_abs_diff_eq!(mics.channel(ChannelId::Right).unwrap().offset_x, 2.0, epsilon = FLOAT_EPSILON);

    let mut truncated =
        MicrophoneConfiguration::create(TechniqueId::DeccaTree, &ConfigOverrides::default());
    truncated.channels.truncate(1);
    engine.set_microphones(truncated);
    let mics = engine.microphones();
    assert_eq!(mics.channels.len(), 3);
    let left = mics.channel(ChannelId::Left).unwrap();
    let right = mics.channel(ChannelId::Right).unwrap();
    let center = mics.channel(ChannelId::Center).unwrap();
    assert_abs_diff_eq!(left.offset_x, -mics.spacing / 2.0, epsilon = FLOAT_EPSILON);
    assert_abs_diff_eq!(right.offset_x, mics.spacing / 2.0, epsilon = FLOAT_EPSILON);
    assert_abs_diff_eq!(center.offset_y, mics.center_depth, epsilon = FLOAT_EPSILON);
    assert!(center.offset_y > 0.0);

    let mut persisted = reference_spaced_pair();
    persisted.spacing = 3.0;
    let built = PodiumEngine::builder().gate_threads(1).microphones(persisted).build().unwrap();
    assert_abs_diff_eq!(
        built.microphones().channel(ChannelId::Right).unwrap().offset_x,
        1.5,
        epsilon = FLOAT_EPSILON
    );
}

#[test]
fn test_session_settings_drive_engine() {
    let json = r#"{"technique":"ortf","angle":120,"micY":-3.5,"msDecodeEnabled":true,"msWidth":1.4}"#;
    let settings: SessionMicSettings = serde_json::from_str(json).unwrap();
    let engine = PodiumEngine::builder()
        .gate_threads(1)
        .microphones(MicrophoneConfiguration::from_session(&settings))
        .build()
        .unwrap();
    let mics = engine.microphones();
    assert_eq!(mics.technique, TechniqueId::Ortf);
    assert_abs_diff_eq!(mics.angle, 120.0, epsilon = FLOAT_EPSILON);
    assert_abs_diff_eq!(mics.mic_y, -3.5, epsilon = FLOAT_EPSILON);
    assert_eq!(mics.to_session().ms_width, Some(1.4));
}

#[test]
fn test_ground_toggle() {
    let engine = test_engine();
    let id = engine.add_source("tuba", SourcePosition::new(0.1, 0.8), mono(vec![0.0; 4]), None).unwrap();
    assert!(engine.render_params(id).unwrap().paths[0].ground.is_none());
    engine.set_ground(Some(GroundSurface::Concrete));
    assert!(engine.render_params(id).unwrap().paths[0].ground.is_some());
}

// =============================================================================
// Gating
// =============================================================================

#[test]
fn test_gate_source_replaces_recording() {
    let engine = test_engine();
    let mut take = vec![0.0; 4800];
    take.extend(generate_sine(330.0, 0.5, 9600));
    take.extend(vec![0.00001; 24000]);
    let id = engine
        .add_source("clarinet", SourcePosition::default(), mono(take), None)
        .unwrap();

    engine.gate_source(id).unwrap();
    assert_eq!(engine.wait_gate(WAIT), Some(id));
    assert_eq!(engine.is_gated(id), Some(true));
    assert_eq!(engine.gates_in_flight(), 0);
}

#[test]
fn test_bell_recording_is_gated_coherently() {
    let engine = test_engine();
    let front = mono(generate_sine(200.0, 0.5, 9600));
    let bell = mono(vec![0.0; 9600]);
    let id = engine
        .add_source("trumpet", SourcePosition::default(), front, Some(bell))
        .unwrap();
    engine.gate_source(id).unwrap();
    assert_eq!(engine.wait_gate(WAIT), Some(id));

    let removed = engine.remove_source(id).unwrap();
    assert!(removed.bell.is_some());
    assert_eq!(removed.front.len(), removed.bell.unwrap().len());
}

#[test]
fn test_removed_source_result_is_dropped() {
    let engine = test_engine();
    let id = engine
        .add_source("harp", SourcePosition::default(), mono(vec![0.3; 48000]), None)
        .unwrap();
    engine.gate_source(id).unwrap();
    engine.remove_source(id).unwrap();
    assert_eq!(engine.wait_gate(Duration::from_millis(500)), None);
}

#[test]
fn test_gate_source_while_another_thread_waits() {
    let engine = test_engine();
    let id = engine
        .add_source("bassoon", SourcePosition::default(), mono(generate_sine(220.0, 0.5, 4800)), None)
        .unwrap();

    std::thread::scope(|scope| {
        let waiter = scope.spawn(|| engine.wait_gate(Duration::from_secs(2)));
        std::thread::sleep(Duration::from_millis(50));

        let started = std::time::Instant::now();
        engine.gate_source(id).unwrap();
        let _ = engine.gates_in_flight();
        assert!(started.elapsed() < Duration::from_millis(500));

        assert_eq!(waiter.join().unwrap(), Some(id));
    });
    assert_eq!(engine.is_gated(id), Some(true));
}

#[test]
fn test_gate_unknown_source() {
    let engine = test_engine();
    let id = engine.add_source("x", SourcePosition::default(), mono(vec![0.0]), None).unwrap();
    engine.remove_source(id).unwrap();
    assert!(matches!(engine.gate_source(id), Err(Error::UnknownSource(_))));
}

// =============================================================================
// Offline mix
// =============================================================================

#[test]
fn test_render_mix_left_source_leads_left() {
    let engine = test_engine();
    engine.set_microphones(reference_spaced_pair());
    engine
        .add_source("violin", SourcePosition::new(-0.8, 0.5), mono(generate_impulse(256, 0)), None)
        .unwrap();
    let mix = engine.render_mix().unwrap();
    assert_eq!(mix.channel_count(), 2);
    let left = onset(mix.channel(0).unwrap(), DSP_EPSILON).unwrap();
    let right = onset(mix.channel(1).unwrap(), DSP_EPSILON).unwrap();
    assert!(left < right);
}

#[test]
fn test_render_mix_with_reverb_is_longer() {
    let engine = test_engine();
    engine
        .add_source("cello", SourcePosition::new(0.2, 0.4), mono(generate_sine(110.0, 0.5, 2400)), None)
        .unwrap();
    let dry = engine.render_mix().unwrap();

    engine.set_reverb(ReverbPreset::SmallRoom);
    let wet = engine.render_mix().unwrap();
    assert!(wet.len() > dry.len());
    assert_not_silent(&wet.channel(0).unwrap()[dry.len()..], PERCEPTUAL_EPSILON, "reverb tail");
    assert!(engine.impulse().is_some());
}

#[test]
fn test_sources_stay_editable_during_render() {
    let engine = test_engine();
    let ids: Vec<SourceId> = (0..4)
        .map(|i| {
            let pos = SourcePosition::new(-0.6 + 0.4 * i as f32, 0.5);
            engine
                .add_source(format!("desk {i}"), pos, mono(generate_sine(196.0, 0.3, 96_000)), None)
                .unwrap()
        })
        .collect();
    engine.set_reverb(ReverbPreset::Cathedral);

    std::thread::scope(|scope| {
        let export = scope.spawn(|| engine.render_mix());
        std::thread::sleep(Duration::from_millis(20));

        let started = std::time::Instant::now();
        engine.move_source(ids[0], SourcePosition::new(0.9, 0.9)).unwrap();
        let extra = engine
            .add_source("timpani", SourcePosition::new(0.0, 1.0), mono(vec![0.0; 16]), None)
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));

        assert_not_silent(
            export.join().unwrap().unwrap().channel(0).unwrap(),
            PERCEPTUAL_EPSILON,
            "export",
        );
        engine.remove_source(extra).unwrap();
    });
}

#[test]
fn test_empty_stage_renders_silence() {
    let engine = test_engine();
    let mix = engine.render_mix().unwrap();
    assert!(mix.is_empty());
}
