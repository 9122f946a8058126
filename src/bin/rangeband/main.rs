use clap::Parser as CliParser;
use log::error;
use rangeband::RangeSlider;
use rangeband::config::Config;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Path to a config file, bypassing the default search path.
  #[arg(short, long)]
  config: Option<std::path::PathBuf>,

  /// Report value changes only when a drag ends.
  #[arg(short, long)]
  release_updates: bool,

  /// Step for the stepped slider.
  #[arg(short, long)]
  step: Option<f32>,
}

struct DemoApp {
  basic: RangeSlider,
  stepped: RangeSlider,
  pushing: RangeSlider,
  crossing: RangeSlider,
  fine: RangeSlider,
  last_change: Option<String>,
}

impl DemoApp {
  fn new(config: &Config, args: &Args) -> Self {
    let continuous = !args.release_updates && config.continuous_updates();
    let step = args.step.unwrap_or_else(|| config.step_value());

    Self {
      basic: RangeSlider::new()
        .with_range(0.0, 100.0)
        .with_values(20.0, 80.0)
        .with_continuous(continuous),
      stepped: RangeSlider::new()
        .with_range(0.0, 100.0)
        .with_values(20.0, 80.0)
        .with_step_value(step)
        .with_continuous(continuous),
      pushing: RangeSlider::new()
        .with_range(0.0, 100.0)
        .with_values(40.0, 60.0)
        .with_minimum_range(10.0)
        .with_push_enabled(true)
        .with_continuous(continuous),
      crossing: RangeSlider::new()
        .with_range(0.0, 100.0)
        .with_values(30.0, 70.0)
        .with_minimum_range(-25.0)
        .with_continuous(continuous),
      fine: RangeSlider::new()
        .with_range(0.0, 100.0)
        .with_values(45.0, 55.0)
        .with_long_press_scales_touches(true)
        .with_continuous(continuous),
      last_change: None,
    }
  }

  fn slider_row(
    ui: &mut egui::Ui,
    label: &str,
    note: &str,
    slider: &mut RangeSlider,
    last_change: &mut Option<String>,
  ) {
    ui.label(format!(
      "{label} [{:.1}, {:.1}]{note}",
      slider.lower_value(),
      slider.upper_value()
    ));
    if ui.add(slider).changed() {
      *last_change = Some(label.to_string());
    }
    ui.add_space(12.0);
  }
}

impl eframe::App for DemoApp {
  fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
    egui::CentralPanel::default().show_inside(ui, |ui| {
      ui.heading("Range sliders");
      ui.add_space(8.0);

      Self::slider_row(ui, "Basic", "", &mut self.basic, &mut self.last_change);
      Self::slider_row(
        ui,
        "Stepped",
        ", snaps on release",
        &mut self.stepped,
        &mut self.last_change,
      );
      Self::slider_row(
        ui,
        "Pushing",
        ", handles shove each other",
        &mut self.pushing,
        &mut self.last_change,
      );

      let crossed_note = if self.crossing.crossed_over() {
        ", crossed over"
      } else {
        ", may cross"
      };
      Self::slider_row(
        ui,
        "Crossing",
        crossed_note,
        &mut self.crossing,
        &mut self.last_change,
      );

      let fine_note = if self.fine.touch_scaling_active() {
        ", fine tuning"
      } else {
        ", hold still to fine tune"
      };
      Self::slider_row(ui, "Fine", fine_note, &mut self.fine, &mut self.last_change);

      ui.horizontal(|ui| {
        if ui.button("Animate").clicked() {
          self.basic.set_values(35.0, 65.0, true);
        }
        if ui.button("Reset").clicked() {
          self.basic.set_values(20.0, 80.0, false);
        }
      });

      if let Some(label) = &self.last_change {
        ui.add_space(8.0);
        ui.label(format!("Last change: {label}"));
      }
    });
  }
}

fn main() -> eframe::Result {
  // init logger.
  env_logger::init();

  let args = Args::parse();
  let config = match &args.config {
    Some(path) => Config::from_path(path).unwrap_or_else(|e| {
      error!("{e}");
      Config::new()
    }),
    None => Config::new(),
  };

  let (width, height) = config.window_size();
  let options = eframe::NativeOptions {
    viewport: egui::ViewportBuilder {
      inner_size: Some(egui::vec2(width, height)),
      ..Default::default()
    },
    ..Default::default()
  };

  eframe::run_native(
    "rangeband",
    options,
    Box::new(move |_cc| Ok(Box::new(DemoApp::new(&config, &args)))),
  )
}
