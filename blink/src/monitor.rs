use {
	indicatif::{ProgressBar, ProgressStyle},
	std::time::Instant,
	tokio::{
		sync::mpsc,
		time::{interval, Duration, Interval},
	},
};

pub struct Monitor {
	spinner: Option<ProgressBar>,
	start_time: Instant,
	update_interval: Interval,
	counters: Counters,
	counter_rx: mpsc::Receiver<CounterMessage>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Counters {
	listed: u64,
	unlisted: u64,
	empty: u64,
	projects: u64,
}

#[derive(Debug)]
pub enum CounterMessage {
	Listed,
	Unlisted,
	NoQuery,
	Project,
}

impl Counters {
	fn record(&mut self, message: CounterMessage) {
		match message {
			CounterMessage::Listed => self.listed += 1,
			CounterMessage::Unlisted => self.unlisted += 1,
			CounterMessage::NoQuery => self.empty += 1,
			CounterMessage::Project => self.projects += 1,
		}
	}

	fn lookups(&self) -> u64 {
		self.listed + self.unlisted
	}
}

impl Monitor {
	pub fn new(counter_rx: mpsc::Receiver<CounterMessage>) -> Self {
		Monitor {
			spinner: None,
			start_time: Instant::now(),
			update_interval: interval(Duration::from_millis(80)),
			counters: Counters::default(),
			counter_rx,
		}
	}

	fn start_spinner(&mut self) {
		let spinner = ProgressBar::new_spinner();
		if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
			spinner.set_style(
				style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
			);
		}
		spinner.enable_steady_tick(Duration::from_millis(80));
		self.spinner = Some(spinner);
	}

	fn update_spinner(&mut self) {
		if let Some(spinner) = &self.spinner {
			spinner.set_message(self.get_display_string());
		}
	}

	fn get_elapsed_time(&self) -> String {
		let elapsed = self.start_time.elapsed();
		let secs = elapsed.as_secs();
		let mins = secs / 60;
		let hrs = mins / 60;
		format!("{}:{:02}:{:02}", hrs, mins % 60, secs % 60)
	}

	fn get_display_string(&self) -> String {
		format!(
			"Server running... | {} | \x1b[1mlookups\x1b[0m: {} ({} listed, {} not listed, {} empty) | \x1b[1mprojects\x1b[0m: {}",
			self.get_elapsed_time(),
			self.counters.lookups(),
			self.counters.listed,
			self.counters.unlisted,
			self.counters.empty,
			self.counters.projects,
		)
	}

	pub async fn run(mut self) {
		self.start_spinner();
		loop {
			tokio::select! {
				message = self.counter_rx.recv() => {
					match message {
						Some(message) => {
							self.counters.record(message);
							self.update_spinner();
						}
						None => break,
					}
				},
				_ = self.update_interval.tick() => {
					self.update_spinner();
				}
			}
		}
		if let Some(spinner) = self.spinner.take() {
			spinner.finish_with_message("Stopped ✔");
		}
	}
}
