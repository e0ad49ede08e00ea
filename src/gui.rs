use crate::libeslestirme::oturum::{self, DropOutcome, Session};
use crate::libeslestirme::sayac::Ticker;
use crate::libeslestirme::ses::{Cue, CuePlayer};
use crate::libeslestirme::soru::{self, Fetch, MatchingQuestion, PromptContent};
use crate::Error;
use eframe::egui;
use eframe::egui::{Align, Color32, Frame, Layout, Margin, RichText, ScrollArea, Stroke, Ui};
use log::debug;
use std::time::Duration;

const CORRECT_FILL: Color32 = Color32::from_rgb(198, 239, 206);
const WRONG_FILL: Color32 = Color32::from_rgb(255, 205, 210);
const CHIP_FILL: Color32 = Color32::from_rgb(187, 222, 251);
const FINISH_FILL: Color32 = Color32::from_rgb(198, 40, 40);

struct ChipId(String);

enum Screen {
    Loading(Fetch),
    Ready(Session),
    Failed(String),
}

enum UiAction {
    None,
    Submitted,
    Exit,
}

pub struct GuiState {
    screen: Screen,
    matching_id: String,
    ticker: Ticker,
    cues: Box<dyn CuePlayer>,
    was_dragging: bool,
    pending_ticks: u32,
}

impl GuiState {
    fn new(
        cc: &eframe::CreationContext<'_>,
        fetch: Fetch,
        matching_id: String,
        cues: Box<dyn CuePlayer>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        GuiState {
            screen: Screen::Loading(fetch),
            matching_id,
            ticker: Ticker::start(Duration::from_secs(1)),
            cues,
            was_dragging: false,
            pending_ticks: 0,
        }
    }

    fn poll_fetch(&mut self) {
        let Screen::Loading(fetch) = &mut self.screen else {
            return;
        };
        let Some(result) = fetch.poll() else {
            return;
        };
        self.screen = match result {
            Ok(items) => match soru::find_matching(&items, &self.matching_id) {
                Some(matching) => {
                    let mut session = Session::new(matching);
                    // seconds that passed while the loading screen was up
                    for _ in 0..self.pending_ticks {
                        session.tick();
                    }
                    self.pending_ticks = 0;
                    Screen::Ready(session)
                }
                None => Screen::Failed(Error::NotFound(self.matching_id.clone()).to_string()),
            },
            Err(err) => Screen::Failed(err.to_string()),
        };
    }
}

impl eframe::App for GuiState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_millis(250));
        let ticks = self.ticker.poll();
        self.poll_fetch();

        let action = match &mut self.screen {
            Screen::Loading(_) => {
                self.pending_ticks += ticks;
                draw_loading(ctx);
                UiAction::None
            }
            Screen::Failed(message) => draw_failed(ctx, message),
            Screen::Ready(session) => {
                for _ in 0..ticks {
                    session.tick();
                }
                draw_session(ctx, session, self.cues.as_ref(), &mut self.was_dragging)
            }
        };

        match action {
            UiAction::None => {}
            UiAction::Submitted => self.ticker.stop(),
            UiAction::Exit => {
                self.ticker.stop();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

fn draw_loading(ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.add(egui::Spinner::new().size(48.0));
            ui.label("Yükleniyor...");
        });
    });
}

fn draw_failed(ctx: &egui::Context, message: &str) -> UiAction {
    let mut action = UiAction::None;
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.label(RichText::new(message).strong());
            ui.add_space(8.0);
            if ui.button("Tamam").clicked() {
                action = UiAction::Exit;
            }
        });
    });
    action
}

fn draw_session(
    ctx: &egui::Context,
    session: &mut Session,
    cues: &dyn CuePlayer,
    was_dragging: &mut bool,
) -> UiAction {
    let mut action = UiAction::None;

    let dragging = egui::DragAndDrop::has_any_payload(ctx);
    if dragging && !*was_dragging {
        cues.play(Cue::Pickup);
    }
    *was_dragging = dragging;

    egui::TopBottomPanel::top("ust_cubuk").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("✖").clicked() {
                session.exit();
                action = UiAction::Exit;
            }
            ui.label("Geçen Süre:");
            ui.label(
                RichText::new(session.elapsed().to_string())
                    .monospace()
                    .strong(),
            );
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let finish =
                    egui::Button::new(RichText::new("Sınavı Bitir").color(Color32::WHITE))
                        .fill(FINISH_FILL);
                if ui.add(finish).clicked() {
                    session.submit();
                    action = UiAction::Submitted;
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("soru_noktalari").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            for idx in 0..session.question_count() {
                if ui.button(format!("{}", idx + 1)).clicked() {
                    debug!("current: {idx}");
                    session.jump(idx);
                }
            }
        })
    });

    let mut drops: Vec<(String, String)> = Vec::new();
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(question) = session.current_question().cloned() else {
            ui.label("Bu eşleştirmede soru yok.");
            return;
        };
        ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&session.matching().title).strong());
                ui.label(format!(
                    "{} ile {}",
                    session.current_index() + 1,
                    session.question_count()
                ));
            });
            ui.add_space(8.0);
            ui.heading(&question.title);
            ui.label(
                RichText::new("Sürükle bırak yaparak sorular ve cevaplarını eşleştiriniz.")
                    .weak(),
            );
            ui.add_space(12.0);

            ui.horizontal_wrapped(|ui| {
                for (index, prompt) in question.question.iter().enumerate() {
                    ui.vertical(|ui| {
                        prompt_ui(ui, prompt);
                        if let Some(chip) = drop_slot_ui(ui, session, index) {
                            drops.push((chip, oturum::drop_zone_id(index)));
                        }
                    });
                }
            });

            ui.add_space(12.0);
            ui.separator();

            ui.horizontal_wrapped(|ui| {
                for &chip in &session.chip_order().to_vec() {
                    chip_ui(ui, session, &question, chip);
                }
            });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let prev = ui.add_enabled(
                    session.current_index() > 0,
                    egui::Button::new("Önceki Soru"),
                );
                if prev.clicked() {
                    session.previous();
                }
                let forward_label = if session.on_last_question() {
                    "Sınavı Bitir"
                } else {
                    "Sonraki Soru"
                };
                if ui.button(forward_label).clicked() && session.advance_or_submit().is_some() {
                    action = UiAction::Submitted;
                }
            });
        });
    });

    for (chip, target) in drops {
        match session.drag_ended(&chip, Some(&target)) {
            Some(DropOutcome::Correct) => cues.play(Cue::Correct),
            Some(DropOutcome::Incorrect) => cues.play(Cue::Wrong),
            None => {}
        }
    }

    if let Some(summary) = session.summary() {
        let prompt_count = session
            .current_question()
            .map_or(0, |question| question.question.len());
        let mut done = false;
        let modal = egui::Modal::new(egui::Id::new("sinav_sonucu")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.heading("Sınav Sonucu");
            ui.label(RichText::new(oturum::SCORING_RULE).strong());
            ui.separator();
            summary_row(ui, "Toplam Soru:", prompt_count.to_string(), None);
            summary_row(
                ui,
                "Doğru Sayısı:",
                summary.correct.to_string(),
                Some(Color32::from_rgb(46, 125, 50)),
            );
            summary_row(
                ui,
                "Yanlış Sayısı:",
                summary.incorrect.to_string(),
                Some(FINISH_FILL),
            );
            summary_row(ui, "Boş Sayısı:", summary.empty.to_string(), None);
            summary_row(ui, "Toplam Puan:", summary.total_points.to_string(), None);
            ui.separator();
            if ui.button("Tamam").clicked() {
                done = true;
            }
        });
        if done || modal.should_close() {
            session.exit();
            action = UiAction::Exit;
        }
    }

    action
}

fn prompt_ui(ui: &mut Ui, prompt: &str) {
    Frame::default()
        .fill(ui.visuals().faint_bg_color)
        .stroke(Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color))
        .inner_margin(Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.set_min_width(200.0);
            match soru::classify_prompt(prompt) {
                PromptContent::Image(url) => {
                    ui.add(egui::Image::new(url).max_size(egui::vec2(300.0, 200.0)));
                }
                PromptContent::Text(text) => {
                    ui.label(text);
                }
            }
        });
}

fn drop_slot_ui(ui: &mut Ui, session: &Session, prompt_index: usize) -> Option<String> {
    let frame = Frame::default()
        .stroke(Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color))
        .inner_margin(Margin::same(8));
    let (_, payload) = ui.dnd_drop_zone::<ChipId, ()>(frame, |ui| {
        ui.set_min_size(egui::vec2(200.0, 48.0));
        match session.placed_answer(prompt_index) {
            Some((text, fits)) => {
                let fill = if fits { CORRECT_FILL } else { WRONG_FILL };
                Frame::default()
                    .fill(fill)
                    .inner_margin(Margin::symmetric(12, 6))
                    .show(ui, |ui| {
                        ui.label(RichText::new(text).color(Color32::BLACK));
                    });
            }
            None => {
                ui.label(RichText::new("buraya bırak").weak());
            }
        }
    });
    payload.map(|chip| chip.0.clone())
}

fn chip_ui(ui: &mut Ui, session: &Session, question: &MatchingQuestion, chip: usize) {
    let Some(text) = question.correct_answer.get(chip) else {
        return;
    };
    if session.is_consumed(chip) {
        Frame::default()
            .fill(ui.visuals().faint_bg_color)
            .inner_margin(Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.label(RichText::new(text).weak());
            });
    } else {
        ui.dnd_drag_source(
            egui::Id::new(("cevap", chip)),
            ChipId(chip.to_string()),
            |ui| {
                Frame::default()
                    .fill(CHIP_FILL)
                    .inner_margin(Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.label(RichText::new(text).color(Color32::BLACK));
                    });
            },
        );
    }
}

fn summary_row(ui: &mut Ui, label: &str, value: String, color: Option<Color32>) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let text = RichText::new(value).strong();
            let text = match color {
                Some(color) => text.color(color),
                None => text,
            };
            ui.label(text);
        });
    });
}

pub fn init_gui(
    fetch: Fetch,
    matching_id: String,
    cues: Box<dyn CuePlayer>,
) -> Result<(), Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Eşleştirelim!",
        native_options,
        Box::new(|cc| Ok(Box::new(GuiState::new(cc, fetch, matching_id, cues)))),
    )?;

    Ok(())
}
