//! End-to-end engine scenarios that cross module boundaries.

use resona_synth::{Division, SynthEngine, SynthParams};

const SR: f32 = 48000.0;

fn render(engine: &mut SynthEngine, seconds: f32) -> Vec<f32> {
    let mut out = vec![0.0f32; (seconds * SR) as usize];
    engine.process_block(&mut out);
    out
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

#[test]
fn sustain_level_matches_velocity_and_master() {
    let params = SynthParams {
        osc1_waveform: resona_synth::Waveform::Sine,
        filter_cutoff_hz: 20000.0,
        ..SynthParams::default()
    };
    let mut engine = SynthEngine::new(SR);
    engine.note_on(60, 100, &params);

    // Skip attack and decay, then measure a sustain window
    render(&mut engine, 0.3);
    let window = render(&mut engine, 0.1);

    let expected = params.master_volume * (100.0 / 127.0) * params.amp_sustain;
    let measured = peak(&window);
    // A sine through a wide-open filter peaks at the envelope value
    assert!(
        (measured - expected).abs() < expected * 0.1,
        "sustain peak {measured}, expected ~{expected}"
    );
}

#[test]
fn silence_after_release_tail() {
    let params = SynthParams::default();
    let mut engine = SynthEngine::new(SR);
    engine.note_on(60, 100, &params);
    render(&mut engine, 0.3);
    engine.note_off(60);

    // Past amp_release (0.3) plus the fixed ring-out tail
    render(&mut engine, 0.5);
    assert_eq!(engine.voice_count(), 0);
    let tail = render(&mut engine, 0.1);
    assert_eq!(peak(&tail), 0.0);
}

#[test]
fn tempo_change_retunes_a_sounding_synced_lfo() {
    let params = SynthParams {
        lfo_enabled: true,
        lfo_bpm_sync: true,
        lfo_division: Division::Eighth,
        lfo_to_filter_hz: 2000.0,
        ..SynthParams::default()
    };
    let mut engine = SynthEngine::new(SR);
    engine.note_on(60, 100, &params);
    render(&mut engine, 0.25);

    let voice = engine.voice(60).expect("voice resident");
    assert!((voice.lfo_rate().unwrap() - 4.0).abs() < 1e-3);

    engine.set_bpm(240.0);
    let voice = engine.voice(60).expect("voice survives tempo change");
    assert!((voice.lfo_rate().unwrap() - 8.0).abs() < 1e-3);
}

#[test]
fn retrigger_does_not_stack_amplitude() {
    let params = SynthParams::default();
    let mut engine = SynthEngine::new(SR);

    engine.note_on(60, 100, &params);
    render(&mut engine, 0.3);
    let single = peak(&render(&mut engine, 0.1));

    engine.note_on(60, 100, &params);
    render(&mut engine, 0.3);
    let retriggered = peak(&render(&mut engine, 0.1));

    assert!(
        retriggered < single * 1.2,
        "retrigger peak {retriggered} vs single {single}"
    );
    assert_eq!(engine.voice_count(), 1);
}

#[test]
fn chord_renders_all_voices_and_reaps_them() {
    let params = SynthParams::default();
    let mut engine = SynthEngine::new(SR);
    for pitch in [48, 52, 55] {
        engine.note_on(pitch, 90, &params);
    }
    assert_eq!(engine.voice_count(), 3);

    let sounding = render(&mut engine, 0.2);
    assert!(peak(&sounding) > 0.1);

    engine.stop_all();
    render(&mut engine, 0.5);
    assert_eq!(engine.voice_count(), 0);
}

#[test]
fn full_patch_stays_finite_through_a_phrase() {
    let params = SynthParams {
        osc2_enabled: true,
        osc2_phase_mod_depth: 3.0,
        noise_enabled: true,
        lfo_enabled: true,
        lfo_to_pitch_cents: 30.0,
        lfo_to_filter_hz: 1500.0,
        lfo_to_amplitude: 0.4,
        lfo_to_phaser_rate: 1.5,
        lfo_to_delay_time: 4.0,
        distortion_enabled: true,
        phaser_enabled: true,
        delay_enabled: true,
        delay_bpm_sync: true,
        delay_feedback: 0.95,
        ..SynthParams::default()
    };
    let mut engine = SynthEngine::new(SR);

    for (n, pitch) in [36u8, 43, 48, 55].iter().enumerate() {
        engine.note_on(*pitch, 110, &params);
        let out = render(&mut engine, 0.2);
        assert!(out.iter().all(|s| s.is_finite()), "note {n} went non-finite");
        engine.note_off(*pitch);
    }
    engine.set_bpm(174.0);
    let out = render(&mut engine, 1.0);
    assert!(out.iter().all(|s| s.is_finite()));
}

#[cfg(feature = "serde")]
#[test]
fn params_round_trip_through_json() {
    let params = SynthParams {
        lfo_bpm_sync: true,
        lfo_division: Division::TripletEighth,
        delay_division: Division::DottedQuarter,
        noise_enabled: true,
        ..SynthParams::default()
    };
    let json = serde_json::to_string(&params).expect("serialize");
    // Divisions serialize as their musical labels
    assert!(json.contains("\"1/8T\""));
    assert!(json.contains("\"1/4.\""));

    let back: SynthParams = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.lfo_division, Division::TripletEighth);
    assert_eq!(back.delay_division, Division::DottedQuarter);
    assert!(back.noise_enabled);
    assert_eq!(back.osc1_waveform, params.osc1_waveform);
}
