use std::io::{self, Write};
use weatherview_core::{CurrentView, ForecastRow, Presenter, Theme};

/// Prints lookup results as plain text. The terminal is append-only, so
/// clearing only forgets the last status line.
#[derive(Debug)]
pub struct TerminalPresenter<W: Write> {
    out: W,
    last_status: Option<String>,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_status: None }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // Nothing useful to do if stdout is gone.
        let _ = writeln!(self.out, "{text}");
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_current(&mut self, view: &CurrentView) {
        self.line("");
        self.line(&view.location);
        self.line(&format!("  Temperature: {}", view.temperature));
        self.line(&format!("  Condition:   {}", view.condition));
        self.line(&format!("  Icon:        {}", view.icon_url));
        self.line(&format!("  Humidity:    {}", view.humidity));
        self.line(&format!("  Wind:        {}", view.wind));
        self.line(&format!("  Sunrise:     {}", view.sunrise));
        self.line(&format!("  Sunset:      {}", view.sunset));
        self.line(&format!("  (:u shows {})", view.unit.toggled().symbol()));
    }

    fn render_forecast(&mut self, rows: &[ForecastRow]) {
        self.line("");
        self.line("5-Day Forecast");
        for row in rows {
            self.line(&format!("  {}: {}, {}", row.date, row.temperature, row.description));
        }
    }

    fn render_status(&mut self, message: &str) {
        if message.is_empty() {
            self.last_status = None;
            return;
        }
        if self.last_status.as_deref() != Some(message) {
            self.line(message);
            self.last_status = Some(message.to_string());
        }
    }

    fn render_error(&mut self, message: &str) {
        self.last_status = None;
        self.line(&format!("! {message}"));
    }

    fn set_theme(&mut self, theme: Theme) {
        if theme == Theme::Default {
            return;
        }
        let (from, to) = theme.gradient();
        self.line(&format!("  Theme:       {theme} ({from} -> {to})"));
    }

    fn clear(&mut self) {
        self.last_status = None;
        let _ = self.out.flush();
    }
}
