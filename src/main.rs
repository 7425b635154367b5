#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use clap::Parser;

#[cfg(feature = "gui")]
use solseq::{Body, RhythmConfig, ToneOutput, Transport};

#[cfg(feature = "gui")]
use std::time::Duration;

/// How long each triggered tone rings.
#[cfg(feature = "gui")]
const NOTE_DURATION: Duration = Duration::from_millis(120);

/// Sonify planetary orbital periods as a polyrhythmic sequencer.
#[cfg(feature = "gui")]
#[derive(Parser, Debug)]
#[command(name = "solseq")]
#[command(about = "Orbital polyrhythm sequencer")]
struct Args {
    /// Derive rhythm ratios from the real orbital periods instead of the
    /// simplified demo table
    #[arg(long)]
    orbital: bool,
}

#[cfg(feature = "gui")]
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = if args.orbital {
        RhythmConfig::orbital()
    } else {
        RhythmConfig::simplified()
    };
    log::info!(
        "starting with policy {:?}, cycle of {} steps",
        config.policy,
        config.cycle_length
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 520.0])
            .with_title("SOLSEQ - Orbital Polyrhythm"),
        ..Default::default()
    };

    eframe::run_native(
        "SOLSEQ",
        options,
        Box::new(move |_cc| Ok(Box::new(OrbitApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("This binary requires the 'gui' feature to be enabled");
    std::process::exit(1);
}

#[cfg(feature = "gui")]
struct OrbitApp {
    transport: Transport,
    audio: ToneOutput,

    // Patterns are derived once from the config and never change
    patterns: Vec<(Body, Vec<bool>)>,
    show_info: bool,
}

#[cfg(feature = "gui")]
impl OrbitApp {
    fn new(config: RhythmConfig) -> Self {
        let patterns = Body::ALL
            .into_iter()
            .map(|body| (body, config.pattern(body)))
            .collect();

        Self {
            transport: Transport::new(config),
            audio: ToneOutput::new(),
            patterns,
            show_info: false,
        }
    }

    fn handle_note_triggers(&mut self) {
        for trigger in self.transport.poll() {
            self.audio.trigger_note(trigger.pitch, NOTE_DURATION);
        }
    }

    fn body_color(body: Body) -> egui::Color32 {
        let (r, g, b) = body.color();
        egui::Color32::from_rgb(r, g, b)
    }

    fn pattern_row(&self, ui: &mut egui::Ui, body: Body, pattern: &[bool]) {
        let cell_size = if pattern.len() > 64 {
            egui::vec2(6.0, 18.0)
        } else {
            egui::vec2(14.0, 18.0)
        };
        let color = Self::body_color(body);
        let current_beat = self.transport.current_beat();

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(2.0, 2.0);
            ui.add_sized(
                [70.0, cell_size.y],
                egui::Label::new(egui::RichText::new(body.name()).color(color)),
            );

            for (i, &active) in pattern.iter().enumerate() {
                let (rect, _) = ui.allocate_exact_size(cell_size, egui::Sense::hover());
                let fill = if active {
                    color
                } else {
                    egui::Color32::from_rgb(30, 30, 34)
                };
                ui.painter().rect_filled(rect, 2.0, fill);
                if i == current_beat {
                    ui.painter().rect_stroke(
                        rect,
                        2.0,
                        egui::Stroke::new(1.5, egui::Color32::WHITE),
                    );
                }
            }
        });
    }
}

#[cfg(feature = "gui")]
impl eframe::App for OrbitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.handle_note_triggers();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("SOLSEQ - Orbital Polyrhythm");
            ui.add_space(10.0);

            // Transport controls
            ui.horizontal(|ui| {
                if self.transport.is_playing() {
                    if ui.button("⏸ Pause").clicked() {
                        self.transport.pause();
                    }
                } else if ui.button("▶ Play").clicked() {
                    // Audio backends need a user gesture before the first tone
                    self.audio.ensure_active();
                    self.transport.play();
                }

                ui.add_space(20.0);

                ui.label("BPM:");
                let mut bpm = self.transport.tempo_bpm();
                if ui
                    .add(egui::Slider::new(&mut bpm, 40..=240))
                    .changed()
                {
                    self.transport.set_tempo(bpm);
                }

                ui.add_space(20.0);

                let mute_label = if self.transport.is_muted() {
                    "🔇 Unmute"
                } else {
                    "🔈 Mute"
                };
                if ui.button(mute_label).clicked() {
                    self.transport.toggle_mute();
                }

                if ui.button("ℹ About").clicked() {
                    self.show_info = !self.show_info;
                }
            });

            ui.add_space(20.0);

            // One activation row per body, current beat outlined
            egui::ScrollArea::horizontal().show(ui, |ui| {
                for (body, pattern) in &self.patterns {
                    self.pattern_row(ui, *body, pattern);
                }
            });

            if self.show_info {
                ui.separator();
                ui.label(
                    "Each planet fires once every N steps, where N follows its \
                     orbital period: Mercury orbits fastest and ticks on every \
                     step, while the outer planets come around only a few times \
                     per cycle. Planets without an assigned pitch stay silent \
                     but still light up.",
                );
            }

            if !self.audio.is_active() && self.transport.is_playing() {
                ui.separator();
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "⚠ No audio output available - running visual-only",
                );
            }
        });
    }
}
