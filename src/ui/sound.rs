/// Procedural sound effects.
///
/// Every effect is synthesized once at startup into an in-memory WAV
/// buffer; playback detaches a rodio Sink per play and never blocks
/// the game loop. Building without the "sound" feature swaps in a
/// do-nothing SoundEngine.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_step: Arc<Vec<u8>>,
        sfx_turn: Arc<Vec<u8>>,
        sfx_push: Arc<Vec<u8>>,
        sfx_blocked: Arc<Vec<u8>>,
        sfx_belt: Arc<Vec<u8>>,
        sfx_destroy: Arc<Vec<u8>>,
        sfx_deal: Arc<Vec<u8>>,
        sfx_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            let sfx_step = Arc::new(make_wav(&gen_step()));
            let sfx_turn = Arc::new(make_wav(&gen_turn()));
            let sfx_push = Arc::new(make_wav(&gen_push()));
            let sfx_blocked = Arc::new(make_wav(&gen_blocked()));
            let sfx_belt = Arc::new(make_wav(&gen_belt()));
            let sfx_destroy = Arc::new(make_wav(&gen_destroy()));
            let sfx_deal = Arc::new(make_wav(&gen_deal()));
            let sfx_over = Arc::new(make_wav(&gen_over()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_step,
                sfx_turn,
                sfx_push,
                sfx_blocked,
                sfx_belt,
                sfx_destroy,
                sfx_deal,
                sfx_over,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            if let Ok(src) = rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                sink.append(src);
                sink.detach(); // fire-and-forget
            }
        }

        pub fn play_step(&self) { self.play(&self.sfx_step); }
        pub fn play_turn(&self) { self.play(&self.sfx_turn); }
        pub fn play_push(&self) { self.play(&self.sfx_push); }
        pub fn play_blocked(&self) { self.play(&self.sfx_blocked); }
        pub fn play_belt(&self) { self.play(&self.sfx_belt); }
        pub fn play_destroy(&self) { self.play(&self.sfx_destroy); }
        pub fn play_deal(&self) { self.play(&self.sfx_deal); }
        pub fn play_over(&self) { self.play(&self.sfx_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Servo step: short square-ish blip, slight downward bend
    fn gen_step() -> Vec<f32> {
        let duration = 0.04;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 330.0 - t * 60.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let wave = (ti * freq * TAU).sin().signum(); // square
                let env = (1.0 - t).powf(1.5);
                wave * env * 0.12
            })
            .collect()
    }

    /// Turn: two tiny high ticks, like a ratchet
    fn gen_turn() -> Vec<f32> {
        let tick_dur = 0.015;
        let gap = 0.02;
        let n_tick = (SAMPLE_RATE as f32 * tick_dur) as usize;
        let n_gap = (SAMPLE_RATE as f32 * gap) as usize;
        let mut samples = Vec::new();
        for rep in 0..2 {
            let freq = 1200.0 + rep as f32 * 200.0;
            for i in 0..n_tick {
                let t = i as f32 / n_tick as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                samples.push((ti * freq * TAU).sin() * (1.0 - t) * 0.15);
            }
            samples.extend(std::iter::repeat(0.0).take(n_gap));
        }
        samples
    }

    /// Push: metal-on-metal clunk — noise burst over a low tone
    fn gen_push() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 777;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * 110.0 * TAU).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(2.0);
                (tone * 0.5 + noise * 0.5) * env * 0.3
            })
            .collect()
    }

    /// Blocked: dull low thud, very fast decay
    fn gen_blocked() -> Vec<f32> {
        let duration = 0.08;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(3.0);
                (ti * 65.0 * TAU).sin() * env * 0.35
            })
            .collect()
    }

    /// Conveyor: short rising hum
    fn gen_belt() -> Vec<f32> {
        let duration = 0.12;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 260.0 + t * 140.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let wave = (ti * freq * TAU).sin() * 0.7 + (ti * freq * 0.5 * TAU).sin() * 0.3;
                let env = (t * 4.0).min(1.0) * (1.0 - t);
                wave * env * 0.18
            })
            .collect()
    }

    /// Destroyed: long glissando down into noise
    fn gen_destroy() -> Vec<f32> {
        let duration = 0.5;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 424242;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 520.0 * (1.0 - t).powf(1.4) + 50.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // Noise takes over as the tone falls
                let mix = tone * (1.0 - t * 0.6) + noise * t * 0.6;
                let env = 1.0 - t.powf(2.0);
                mix * env * 0.3
            })
            .collect()
    }

    /// Deal: accelerating riffle of card ticks
    fn gen_deal() -> Vec<f32> {
        let mut samples = Vec::new();
        let mut rng: u32 = 31337;
        for rep in 0..7 {
            let tick = (SAMPLE_RATE as f32 * 0.012) as usize;
            let gap = (SAMPLE_RATE as f32 * (0.05 - rep as f32 * 0.005)) as usize;
            for i in 0..tick {
                let t = i as f32 / tick as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                samples.push(noise * (1.0 - t) * 0.2);
            }
            samples.extend(std::iter::repeat(0.0).take(gap));
        }
        samples
    }

    /// Game over: slow three-note descent with a final fade
    fn gen_over() -> Vec<f32> {
        let notes = [311.0_f32, 262.0, 196.0]; // Eb4, C4, G3
        let note_dur = 0.22;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.25;
                let wave = (ti * freq * TAU).sin() * 0.7 + (ti * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        let fade_len = samples.len() / 3;
        let total = samples.len();
        for i in (total - fade_len)..total {
            let ratio = (total - i) as f32 / fade_len as f32;
            samples[i] *= ratio;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — mono 16-bit PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const SAMPLE_BITS: u16 = 16;
        const BLOCK_ALIGN: u16 = CHANNELS * SAMPLE_BITS / 8;

        let data_size = (samples.len() * BLOCK_ALIGN as usize) as u32;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // uncompressed PCM
        buf.extend_from_slice(&CHANNELS.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * BLOCK_ALIGN as u32).to_le_bytes());
        buf.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_BITS.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public surface — a silent stub when the feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_step(&self) {}
    pub fn play_turn(&self) {}
    pub fn play_push(&self) {}
    pub fn play_blocked(&self) {}
    pub fn play_belt(&self) {}
    pub fn play_destroy(&self) {}
    pub fn play_deal(&self) {}
    pub fn play_over(&self) {}
}
