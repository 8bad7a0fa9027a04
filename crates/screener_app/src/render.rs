use std::io::{self, Write};

use screener_core::{
    AppViewModel, FileBodyView, FilePhase, RubricListsView, StatusKind, StatusLine,
};

/// Incremental terminal renderer.
///
/// Prints only what changed since the last view, so streamed partial
/// fragments append to the current line instead of redrawing the screen.
pub struct Renderer {
    status: Option<StatusLine>,
    rubric_status: Option<StatusLine>,
    files: Vec<FileTrace>,
    download_link: Option<String>,
    line_open: bool,
}

struct FileTrace {
    phase: FilePhase,
    printed_log_bytes: usize,
    outcome_printed: bool,
}

impl Default for FileTrace {
    fn default() -> Self {
        Self {
            phase: FilePhase::Starting,
            printed_log_bytes: 0,
            outcome_printed: false,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            status: None,
            rubric_status: None,
            files: Vec::new(),
            download_link: None,
            line_open: false,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        let mut out = io::stdout().lock();

        if view.status != self.status {
            if let Some(line) = &view.status {
                close_line(&mut self.line_open, &mut out)?;
                writeln!(out, "{}", format_status(line))?;
            }
            self.status = view.status.clone();
        }
        if view.rubric_status != self.rubric_status {
            if let Some(line) = &view.rubric_status {
                close_line(&mut self.line_open, &mut out)?;
                writeln!(out, "{}", format_status(line))?;
            }
            self.rubric_status = view.rubric_status.clone();
        }

        if view.files.len() < self.files.len() {
            // A new submission cleared the results.
            self.files.clear();
        }

        for (idx, row) in view.files.iter().enumerate() {
            if idx == self.files.len() {
                close_line(&mut self.line_open, &mut out)?;
                writeln!(out, "=== {} ===", row.filename)?;
                writeln!(out, "{}", FilePhase::Starting.label())?;
                self.files.push(FileTrace::default());
            }
            let trace = &mut self.files[idx];
            match &row.body {
                FileBodyView::InProgress { phase, log } => {
                    if *phase != trace.phase {
                        close_line(&mut self.line_open, &mut out)?;
                        writeln!(out, "{}", phase.label())?;
                        trace.phase = *phase;
                    }
                    if log.len() > trace.printed_log_bytes {
                        write!(out, "{}", &log[trace.printed_log_bytes..])?;
                        out.flush()?;
                        trace.printed_log_bytes = log.len();
                        self.line_open = !log.ends_with('\n');
                    }
                }
                FileBodyView::Verdict { verdict, reasons } => {
                    if !trace.outcome_printed {
                        close_line(&mut self.line_open, &mut out)?;
                        writeln!(out, "Verdict: {verdict}")?;
                        for reason in reasons {
                            writeln!(out, "  - {reason}")?;
                        }
                        trace.outcome_printed = true;
                    }
                }
                FileBodyView::Error(message) => {
                    if !trace.outcome_printed {
                        close_line(&mut self.line_open, &mut out)?;
                        writeln!(out, "error: {message}")?;
                        trace.outcome_printed = true;
                    }
                }
            }
        }

        if view.download_link != self.download_link {
            if let Some(link) = &view.download_link {
                close_line(&mut self.line_open, &mut out)?;
                writeln!(out, "Report available: {link}")?;
            }
            self.download_link = view.download_link.clone();
        }

        Ok(())
    }

    /// Prints both rubric lists in full, the way the page renders them.
    pub fn render_rubric_lists(&mut self, view: &AppViewModel) -> io::Result<()> {
        let mut out = io::stdout().lock();
        close_line(&mut self.line_open, &mut out)?;

        match &view.rubric_lists {
            RubricListsView::Loading => writeln!(out, "Loading rubrics..."),
            RubricListsView::Failed(message) => writeln!(out, "[error] {message}"),
            RubricListsView::Loaded { options, saved } => {
                writeln!(out, "Available rubrics:")?;
                if options.is_empty() {
                    writeln!(out, "  No rubrics available")?;
                } else {
                    for option in options {
                        writeln!(out, "  {}  ({})", option.label, option.id)?;
                    }
                }
                writeln!(out, "Uploaded rubrics:")?;
                if saved.is_empty() {
                    writeln!(out, "  No rubrics uploaded yet")?;
                } else {
                    for name in saved {
                        writeln!(out, "  {name}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn close_line(line_open: &mut bool, out: &mut impl Write) -> io::Result<()> {
    if *line_open {
        writeln!(out)?;
        *line_open = false;
    }
    Ok(())
}

fn format_status(line: &StatusLine) -> String {
    let tag = match line.kind {
        StatusKind::Info => "info",
        StatusKind::Success => "ok",
        StatusKind::Error => "error",
    };
    format!("[{tag}] {}", line.text)
}
