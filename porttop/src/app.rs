//! App state and main loop: input handling, spawning polls, applying their results, and drawing.
//!
//! Three surfaces refresh on their own timers: the port list (full snapshot), the
//! detail panel (re-enrich the selected record) and the header summary (listener
//! count). Each poll runs as a spawned task and reports back over a channel.

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use anyhow::Context;
use chrono::{DateTime, Local};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use porttop_core::{
    type_counts, CommandRunner, EnrichedPort, PortFilter, PortPipeline, ServiceKind, Snapshot,
    SystemRunner, TerminateError,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    time::sleep,
};
use tracing::{debug, info};

use crate::clipboard::osc52;
use crate::config::TuiConfig;
use crate::open::open_url;
use crate::ui::{
    detail::draw_detail,
    header::{draw_header, draw_status, HeaderView},
    ports::{draw_ports, ensure_visible, page_size, row_at, PortsView},
    prompt::{draw_confirm_kill, draw_rename},
};

/// Results delivered by spawned polls and actions.
#[derive(Debug)]
pub enum PollEvent {
    List(Snapshot),
    Detail(EnrichedPort),
    Summary(Result<usize, String>),
    Terminated(Result<Vec<u32>, TerminateError>, u16),
    Opened(Result<(), String>),
}

/// Timer bookkeeping for one independently polled region.
#[derive(Debug, Clone)]
pub struct Surface {
    pub interval: Duration,
    pub auto_refresh: bool,
    last_started: Option<Instant>,
    in_flight: bool,
}

impl Surface {
    pub fn new(interval: Duration, auto_refresh: bool) -> Self {
        Self {
            interval,
            auto_refresh,
            last_started: None,
            in_flight: false,
        }
    }

    /// A timed poll is due: auto-refresh on, nothing in flight, interval elapsed.
    pub fn due(&self, now: Instant) -> bool {
        self.auto_refresh
            && !self.in_flight
            && self
                .last_started
                .map_or(true, |t| now.duration_since(t) >= self.interval)
    }

    /// Mark a poll as started; false if one is already running.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.last_started = Some(now);
        true
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Rename { port: u16, buffer: String },
    ConfirmKill { port: u16, name: String },
}

pub struct App<R = SystemRunner> {
    pipeline: PortPipeline<R>,
    tx: UnboundedSender<PollEvent>,
    rx: UnboundedReceiver<PollEvent>,

    // Latest list snapshot and the filtered view over it
    ports: Vec<EnrichedPort>,
    visible: Vec<usize>,
    counts: Vec<(ServiceKind, usize)>,
    filter: PortFilter,
    selected: usize,
    scroll_offset: usize,
    last_refresh: Option<DateTime<Local>>,

    // Freshest enrichment of the selected record
    detail: Option<EnrichedPort>,
    summary: Option<Result<usize, String>>,

    list_poll: Surface,
    detail_poll: Surface,
    summary_poll: Surface,

    mode: InputMode,
    status: Option<String>,
    // OSC 52 sequence waiting to be written to the terminal
    clipboard: Option<String>,
    last_table_area: Option<Rect>,
    should_quit: bool,
}

impl<R: CommandRunner + 'static> App<R> {
    pub fn new(pipeline: PortPipeline<R>, cfg: &TuiConfig, filter: PortFilter) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            pipeline,
            tx,
            rx,
            ports: Vec::new(),
            visible: Vec::new(),
            counts: Vec::new(),
            filter,
            selected: 0,
            scroll_offset: 0,
            last_refresh: None,
            detail: None,
            summary: None,
            list_poll: Surface::new(cfg.list_interval, cfg.auto_refresh),
            detail_poll: Surface::new(cfg.detail_interval, cfg.auto_refresh),
            summary_poll: Surface::new(cfg.summary_interval, cfg.auto_refresh),
            mode: InputMode::Normal,
            status: None,
            clipboard: None,
            last_table_area: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.clear()?;

        // First paint should not wait for the timers, even with auto-refresh off
        self.spawn_list();
        self.spawn_summary();

        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(k) if k.kind != KeyEventKind::Release => self.handle_key(k),
                    Event::Mouse(m) => self.handle_mouse(m),
                    _ => {}
                }
            }
            if self.should_quit {
                break;
            }
            if let Some(seq) = self.clipboard.take() {
                let mut out = io::stdout();
                out.write_all(seq.as_bytes())?;
                out.flush()?;
            }

            while let Ok(ev) = self.rx.try_recv() {
                self.apply(ev);
            }

            self.tick(Instant::now());

            terminal.draw(|f| self.draw(f))?;

            sleep(Duration::from_millis(40)).await;
        }
        Ok(())
    }

    /// Start whichever timed polls are due.
    fn tick(&mut self, now: Instant) {
        if self.list_poll.due(now) {
            self.spawn_list();
        }
        if self.detail_poll.due(now) {
            self.spawn_detail();
        }
        if self.summary_poll.due(now) {
            self.spawn_summary();
        }
    }

    fn spawn_list(&mut self) {
        if !self.list_poll.begin(Instant::now()) {
            return;
        }
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(PollEvent::List(pipeline.snapshot().await));
        });
    }

    fn spawn_detail(&mut self) {
        let Some(record) = self.selected_port().map(|p| p.record.clone()) else {
            return;
        };
        if !self.detail_poll.begin(Instant::now()) {
            return;
        }
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(PollEvent::Detail(pipeline.enrich(&record).await));
        });
    }

    fn spawn_summary(&mut self) {
        if !self.summary_poll.begin(Instant::now()) {
            return;
        }
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let res = pipeline
                .try_scan()
                .await
                .map(|records| records.len())
                .map_err(|e| e.to_string());
            let _ = tx.send(PollEvent::Summary(res));
        });
    }

    fn spawn_terminate(&mut self, port: u16) {
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        self.status = Some(format!("killing port {port}..."));
        tokio::spawn(async move {
            let res = pipeline.terminate(port).await;
            let _ = tx.send(PollEvent::Terminated(res, port));
        });
    }

    fn spawn_open(&mut self, url: String) {
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let res = open_url(pipeline.runner(), &url)
                .await
                .map_err(|e| format!("{e:#}"));
            let _ = tx.send(PollEvent::Opened(res));
        });
    }

    pub fn apply(&mut self, ev: PollEvent) {
        match ev {
            PollEvent::List(snap) => {
                self.list_poll.finish();
                self.apply_snapshot(snap);
            }
            PollEvent::Detail(p) => {
                self.detail_poll.finish();
                // selection may have moved while the poll ran
                if self
                    .selected_port()
                    .is_some_and(|s| s.port() == p.port() && s.pid() == p.pid())
                {
                    self.detail = Some(p);
                }
            }
            PollEvent::Summary(res) => {
                self.summary_poll.finish();
                self.summary = Some(res);
            }
            PollEvent::Terminated(res, port) => match res {
                Ok(pids) => {
                    let list: Vec<String> = pids.iter().map(u32::to_string).collect();
                    info!(port, "killed from tui");
                    self.status = Some(format!("killed port {port} (pid {})", list.join(", ")));
                    self.spawn_list();
                    self.spawn_summary();
                }
                Err(e) => self.status = Some(format!("error: {e}")),
            },
            PollEvent::Opened(res) => {
                if let Err(e) = res {
                    self.status = Some(format!("error: {e}"));
                }
            }
        }
    }

    fn apply_snapshot(&mut self, snap: Snapshot) {
        let keep = self.selected_port().map(|p| (p.port(), p.pid()));
        // a clean list also settles the header until the next summary poll
        self.summary = Some(match &snap.scan_error {
            Some(err) => {
                debug!("list poll: {err}");
                Err(err.clone())
            }
            None => Ok(snap.ports.len()),
        });
        self.ports = snap.ports;
        self.counts = type_counts(&self.ports);
        self.last_refresh = Some(Local::now());
        self.refilter(keep);
    }

    /// Recompute the visible rows, keeping the (port, pid) selection when it survives.
    fn refilter(&mut self, keep: Option<(u16, u32)>) {
        if self
            .filter
            .kind
            .is_some_and(|k| !self.counts.iter().any(|(c, _)| *c == k))
        {
            self.filter.kind = None;
        }
        self.visible = self.filter.apply(&self.ports);
        let found = keep.and_then(|(port, pid)| {
            self.visible.iter().position(|&ix| {
                let p = &self.ports[ix];
                p.port() == port && p.pid() == pid
            })
        });
        self.selected = match found {
            Some(pos) => pos,
            None => self.selected.min(self.visible.len().saturating_sub(1)),
        };
        self.sync_detail();
        self.ensure_visible();
    }

    /// Point the detail panel at the current selection, reusing the list's enrichment.
    fn sync_detail(&mut self) {
        let same = match (&self.detail, self.selected_port()) {
            (Some(d), Some(s)) => d.port() == s.port() && d.pid() == s.pid(),
            _ => false,
        };
        if !same {
            self.detail = self.selected_port().cloned();
        } else if let Some(ix) = self.selected_port_index() {
            if let Some(d) = self.detail.as_mut() {
                d.custom_name = self.ports[ix].custom_name.clone();
            }
        }
    }

    fn selected_port_index(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    pub fn selected_port(&self) -> Option<&EnrichedPort> {
        self.selected_port_index().and_then(|ix| self.ports.get(ix))
    }

    fn page(&self) -> usize {
        self.last_table_area.map(page_size).unwrap_or(10)
    }

    fn ensure_visible(&mut self) {
        let page = self.page();
        ensure_visible(self.selected, &mut self.scroll_offset, page);
    }

    fn select(&mut self, pos: usize) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = pos.min(self.visible.len() - 1);
        self.ensure_visible();
        self.sync_detail();
    }

    fn move_selection(&mut self, step: isize) {
        let pos = self.selected.saturating_add_signed(step);
        self.select(pos);
    }

    pub fn handle_key(&mut self, k: KeyEvent) {
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode.clone() {
            InputMode::Normal => self.handle_normal_key(k.code),
            InputMode::Filter => self.handle_filter_key(k.code),
            InputMode::Rename { port, buffer } => self.handle_rename_key(k.code, port, buffer),
            InputMode::ConfirmKill { port, .. } => {
                self.mode = InputMode::Normal;
                if matches!(k.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.spawn_terminate(port);
                } else {
                    self.status = Some("kill cancelled".into());
                }
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        self.status = None;
        let page = self.page() as isize;
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(page),
            KeyCode::PageUp => self.move_selection(-page),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(usize::MAX),
            KeyCode::Char('/') => self.mode = InputMode::Filter,
            KeyCode::Char('t') => self.cycle_kind(),
            KeyCode::Char('T') => {
                self.filter.kind = None;
                self.refilter(self.selected_key());
            }
            KeyCode::Char('K') | KeyCode::Char('x') => {
                if let Some(p) = self.selected_port() {
                    self.mode = InputMode::ConfirmKill {
                        port: p.port(),
                        name: p.display_name().to_string(),
                    };
                }
            }
            KeyCode::Char('n') => {
                if let Some(p) = self.selected_port() {
                    self.mode = InputMode::Rename {
                        port: p.port(),
                        buffer: p.custom_name.clone().unwrap_or_default(),
                    };
                }
            }
            KeyCode::Char('o') => {
                if let Some(url) = self.selected_port().map(|p| p.record.url()) {
                    self.status = Some(format!("opening {url}"));
                    self.spawn_open(url);
                }
            }
            KeyCode::Char('y') => {
                if let Some(cmd) = self.selected_port().map(|p| p.kill_command()) {
                    self.clipboard = Some(osc52(&cmd));
                    self.status = Some(format!("copied '{cmd}'"));
                }
            }
            KeyCode::Char('r') => {
                self.spawn_list();
                self.spawn_summary();
                self.spawn_detail();
            }
            KeyCode::Char('a') => {
                self.list_poll.auto_refresh = !self.list_poll.auto_refresh;
                self.summary_poll.auto_refresh = self.list_poll.auto_refresh;
                self.status = Some(format!(
                    "list auto-refresh {}",
                    on_off(self.list_poll.auto_refresh)
                ));
            }
            KeyCode::Char('d') => {
                self.detail_poll.auto_refresh = !self.detail_poll.auto_refresh;
                self.status = Some(format!(
                    "detail auto-refresh {}",
                    on_off(self.detail_poll.auto_refresh)
                ));
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        let keep = self.selected_key();
        match code {
            KeyCode::Enter => self.mode = InputMode::Normal,
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.filter.text.clear();
            }
            KeyCode::Backspace => {
                self.filter.text.pop();
            }
            KeyCode::Char(c) => self.filter.text.push(c),
            _ => return,
        }
        self.refilter(keep);
    }

    fn handle_rename_key(&mut self, code: KeyCode, port: u16, mut buffer: String) {
        match code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                self.rename(port, &buffer);
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::Rename { port, buffer };
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = InputMode::Rename { port, buffer };
            }
            _ => {}
        }
    }

    fn rename(&mut self, port: u16, name: &str) {
        let labels = self.pipeline.labels();
        self.status = Some(match labels.set(port, name) {
            Ok(()) => match labels.get(port) {
                Some(label) => format!("port {port} labelled '{label}'"),
                None => format!("port {port} label cleared"),
            },
            Err(e) => format!("error: {e}"),
        });
        // the store keeps the label in memory even if saving failed
        let current = labels.get(port);
        for p in self.ports.iter_mut().filter(|p| p.port() == port) {
            p.custom_name = current.clone();
        }
        if let Some(d) = self.detail.as_mut().filter(|d| d.port() == port) {
            d.custom_name = current;
        }
        self.refilter(self.selected_key());
    }

    fn cycle_kind(&mut self) {
        if self.counts.is_empty() {
            return;
        }
        let next = match self.filter.kind {
            None => Some(self.counts[0].0),
            Some(k) => self
                .counts
                .iter()
                .position(|(c, _)| *c == k)
                .and_then(|i| self.counts.get(i + 1))
                .map(|(c, _)| *c),
        };
        self.filter.kind = next;
        self.refilter(self.selected_key());
    }

    fn selected_key(&self) -> Option<(u16, u32)> {
        self.selected_port().map(|p| (p.port(), p.pid()))
    }

    fn handle_mouse(&mut self, m: MouseEvent) {
        let Some(area) = self.last_table_area else {
            return;
        };
        let inside = m.column >= area.x
            && m.column < area.x + area.width
            && m.row >= area.y
            && m.row < area.y + area.height;
        if !inside || self.mode != InputMode::Normal {
            return;
        }
        match m.kind {
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(pos) = row_at(area, m.column, m.row, self.scroll_offset) {
                    if pos < self.visible.len() {
                        self.select(pos);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // header + type chips
                Constraint::Min(5),    // table + detail
                Constraint::Length(1), // status
            ])
            .split(area);

        draw_header(
            f,
            rows[0],
            &HeaderView {
                summary: self.summary.as_ref(),
                filter: &self.filter,
                editing_filter: self.mode == InputMode::Filter,
                counts: &self.counts,
                last_refresh: self.last_refresh,
            },
        );

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
            .split(rows[1]);

        // Cache for input handlers
        self.last_table_area = Some(body[0]);
        self.ensure_visible();
        draw_ports(
            f,
            body[0],
            &PortsView {
                ports: &self.ports,
                visible: &self.visible,
                selected: self.selected,
                scroll_offset: self.scroll_offset,
                auto_refresh: self.list_poll.auto_refresh,
            },
        );
        draw_detail(f, body[1], self.detail.as_ref(), self.detail_poll.auto_refresh);

        draw_status(f, rows[2], self.status.as_deref());

        match &self.mode {
            InputMode::ConfirmKill { port, name } => draw_confirm_kill(f, area, *port, name),
            InputMode::Rename { port, buffer } => draw_rename(f, area, *port, buffer),
            _ => {}
        }
    }

    #[cfg(test)]
    fn visible_ports(&self) -> Vec<u16> {
        self.visible.iter().map(|&i| self.ports[i].port()).collect()
    }
}

fn on_off(v: bool) -> &'static str {
    if v {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porttop_core::enrich::enrich_with;
    use porttop_core::{
        CommandError, CommandOutput, LabelStore, PortRecord, ResourceUsage, UsageSource,
    };

    struct NoopRunner;

    impl CommandRunner for NoopRunner {
        async fn run(&self, _: &str, _: &[&str]) -> Result<CommandOutput, CommandError> {
            Ok(CommandOutput::default())
        }
    }

    fn app() -> App<NoopRunner> {
        let pipeline = PortPipeline::new(NoopRunner, LabelStore::in_memory(), UsageSource::Ps);
        let cfg = TuiConfig {
            auto_refresh: false,
            ..TuiConfig::default()
        };
        App::new(pipeline, &cfg, PortFilter::default())
    }

    fn snapshot(app: &App<NoopRunner>, entries: &[(u16, u32, &str)]) -> Snapshot {
        let ports = entries
            .iter()
            .map(|&(port, pid, command)| {
                let r = PortRecord {
                    port,
                    pid,
                    user: "dev".into(),
                    command: command.into(),
                };
                enrich_with(&r, ResourceUsage::unknown(), app.pipeline.labels())
            })
            .collect();
        Snapshot {
            ports,
            scan_error: None,
        }
    }

    fn key(app: &mut App<NoopRunner>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn surface_timing() {
        let t0 = Instant::now();
        let mut s = Surface::new(Duration::from_secs(3), true);
        assert!(s.due(t0));
        assert!(s.begin(t0));
        assert!(!s.begin(t0), "second poll while one is in flight");
        s.finish();
        assert!(!s.due(t0 + Duration::from_secs(1)));
        assert!(s.due(t0 + Duration::from_secs(3)));

        let off = Surface::new(Duration::from_secs(3), false);
        assert!(!off.due(t0));
    }

    #[test]
    fn selection_follows_port_across_refreshes() {
        let mut a = app();
        let snap = snapshot(&a, &[(3000, 1, "node"), (5432, 2, "postgres"), (8080, 3, "java")]);
        a.apply(PollEvent::List(snap));
        key(&mut a, KeyCode::Down);
        assert_eq!(a.selected_port().map(|p| p.port()), Some(5432));

        // a new listener sorts in front of the selection
        let snap = snapshot(
            &a,
            &[(80, 9, "nginx"), (3000, 1, "node"), (5432, 2, "postgres"), (8080, 3, "java")],
        );
        a.apply(PollEvent::List(snap));
        assert_eq!(a.selected_port().map(|p| p.port()), Some(5432));
        assert_eq!(a.detail.as_ref().map(|d| d.port()), Some(5432));
    }

    #[test]
    fn live_text_filter_and_type_cycle() {
        let mut a = app();
        let snap = snapshot(&a, &[(3000, 1, "node"), (5432, 2, "postgres"), (9229, 3, "node")]);
        a.apply(PollEvent::List(snap));

        key(&mut a, KeyCode::Char('/'));
        key(&mut a, KeyCode::Char('p'));
        key(&mut a, KeyCode::Char('o'));
        key(&mut a, KeyCode::Char('s'));
        assert_eq!(a.visible_ports(), vec![5432]);
        key(&mut a, KeyCode::Esc);
        assert_eq!(a.visible_ports(), vec![3000, 5432, 9229]);
        assert_eq!(a.mode, InputMode::Normal);

        key(&mut a, KeyCode::Char('t'));
        assert_eq!(a.filter.kind, Some(ServiceKind::ReactNext));
        assert_eq!(a.visible_ports(), vec![3000]);
        key(&mut a, KeyCode::Char('t'));
        key(&mut a, KeyCode::Char('t'));
        assert_eq!(a.filter.kind, Some(ServiceKind::NodeJs));
        assert_eq!(a.visible_ports(), vec![9229]);
        key(&mut a, KeyCode::Char('t'));
        assert_eq!(a.filter.kind, None);
        key(&mut a, KeyCode::Char('t'));
        key(&mut a, KeyCode::Char('T'));
        assert_eq!(a.filter.kind, None);
    }

    #[test]
    fn rename_prefills_and_updates_rows() {
        let mut a = app();
        let snap = snapshot(&a, &[(3000, 1, "node")]);
        a.apply(PollEvent::List(snap));

        key(&mut a, KeyCode::Char('n'));
        assert_eq!(
            a.mode,
            InputMode::Rename {
                port: 3000,
                buffer: String::new()
            }
        );
        for c in "Shop".chars() {
            key(&mut a, KeyCode::Char(c));
        }
        key(&mut a, KeyCode::Enter);
        assert_eq!(a.ports[0].custom_name.as_deref(), Some("Shop"));
        assert_eq!(a.detail.as_ref().unwrap().display_name(), "Shop");

        key(&mut a, KeyCode::Char('n'));
        assert_eq!(
            a.mode,
            InputMode::Rename {
                port: 3000,
                buffer: "Shop".into()
            }
        );
        for _ in 0..4 {
            key(&mut a, KeyCode::Backspace);
        }
        key(&mut a, KeyCode::Enter);
        assert!(a.ports[0].custom_name.is_none());
        assert_eq!(a.status.as_deref(), Some("port 3000 label cleared"));
    }

    #[test]
    fn kill_needs_confirmation() {
        let mut a = app();
        let snap = snapshot(&a, &[(3000, 1, "node")]);
        a.apply(PollEvent::List(snap));

        key(&mut a, KeyCode::Char('K'));
        assert!(matches!(a.mode, InputMode::ConfirmKill { port: 3000, .. }));
        key(&mut a, KeyCode::Char('n'));
        assert_eq!(a.mode, InputMode::Normal);
        assert_eq!(a.status.as_deref(), Some("kill cancelled"));

        a.apply(PollEvent::Terminated(
            Err(TerminateError::NoProcesses { port: 3000 }),
            3000,
        ));
        assert!(a.status.as_deref().unwrap().contains("port 3000"));
    }

    #[test]
    fn scan_error_reaches_summary() {
        let mut a = app();
        a.apply(PollEvent::List(Snapshot {
            ports: Vec::new(),
            scan_error: Some("lsof not found".into()),
        }));
        assert_eq!(a.summary, Some(Err("lsof not found".into())));
        assert!(a.selected_port().is_none());
    }

    #[test]
    fn copy_kill_command_of_selection() {
        let mut a = app();
        key(&mut a, KeyCode::Char('y'));
        assert!(a.clipboard.is_none());

        let snap = snapshot(&a, &[(3000, 1234, "node"), (5432, 2, "postgres")]);
        a.apply(PollEvent::List(snap));
        key(&mut a, KeyCode::Char('y'));
        assert_eq!(a.clipboard.as_deref(), Some(osc52("kill -9 1234").as_str()));
        assert_eq!(a.status.as_deref(), Some("copied 'kill -9 1234'"));
    }

    #[test]
    fn clean_list_clears_scan_error() {
        let mut a = app();
        a.apply(PollEvent::List(Snapshot {
            ports: Vec::new(),
            scan_error: Some("lsof not found".into()),
        }));
        let snap = snapshot(&a, &[(3000, 1, "node"), (5432, 2, "postgres")]);
        a.apply(PollEvent::List(snap));
        assert_eq!(a.summary, Some(Ok(2)));
    }

    #[test]
    fn stale_detail_is_dropped() {
        let mut a = app();
        let snap = snapshot(&a, &[(3000, 1, "node"), (5432, 2, "postgres")]);
        let other = snap.ports[1].clone();
        a.apply(PollEvent::List(snap));
        let mut fresh = other;
        fresh.cpu = "42.0%".into();
        a.apply(PollEvent::Detail(fresh));
        assert_eq!(a.detail.as_ref().map(|d| d.port()), Some(3000));
    }
}
