//! Terminal host for the vista interaction engine
//!
//! Renders a scrollable grid of service cards. Cards reveal the first time
//! they scroll into view, and the card under the mouse tilts toward the
//! pointer and takes the focus slot.
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::Duration;
use vista_core::{
    EngineConfig, FocusIndex, GeometryObserver, RevealTracker, TiltInteractor, TiltTransform, WatchedElement,
};

pub mod config;
pub mod layout;
pub mod renderer;

pub use config::load_config;
pub use layout::CardGrid;
pub use renderer::{CardRenderer, CardStyle};

const SERVICES: &[&str] = &[
    "Custom Website Design",
    "Full-Stack Web Development",
    "AI-Powered Chatbots",
    "Social Media Management",
    "Brand Identity & Visual Design",
    "Digital Advertising",
    "SEO & Growth Strategy",
    "AI Automation Agents",
    "Mobile App Development",
    "Marketing Audit & Planning",
    "E-Commerce Development",
    "Content & Copywriting",
];

/// Title for the card at `index`, cycling through the service list
pub fn card_title(index: usize) -> &'static str {
    SERVICES[index % SERVICES.len()]
}

/// Card grid state plus the engines driving it. Card handles are indices.
pub struct CardScene {
    cards: Vec<Rc<WatchedElement<usize>>>,
    grid: CardGrid,
    reveal: RevealTracker<usize, GeometryObserver<usize>>,
    tilt: TiltInteractor<usize>,
    focus: FocusIndex,
    transforms: Vec<TiltTransform>,
    scroll: u32,
    width: u16,
    height: u16,
}

impl CardScene {
    pub fn new(config: EngineConfig, card_count: usize, width: u16, height: u16) -> Self {
        let cards: Vec<_> = (0..card_count).map(|i| Rc::new(WatchedElement::new(i))).collect();

        let mut reveal = RevealTracker::new(config.reveal, Some(GeometryObserver::new()));
        reveal.register(&cards);
        let mut tilt = TiltInteractor::new(config.tilt);
        tilt.register(0..card_count);

        let mut scene = Self {
            cards,
            grid: CardGrid::new(card_count, width),
            reveal,
            tilt,
            focus: FocusIndex::new(),
            transforms: vec![TiltTransform::identity(); card_count],
            scroll: 0,
            width,
            height,
        };
        scene.update_reveal();
        scene
    }

    pub fn scroll(&self) -> u32 {
        self.scroll
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus.current()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.cards.get(index).is_some_and(|card| card.is_revealed())
    }

    pub fn revealed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_revealed()).count()
    }

    pub fn transform(&self, index: usize) -> Option<&TiltTransform> {
        self.transforms.get(index)
    }

    fn max_scroll(&self) -> u32 {
        let visible = self.height.saturating_sub(layout::HEADER_ROWS) as u32;
        self.grid.content_rows().saturating_sub(visible)
    }

    /// Scroll by `delta` rows, clamped to the document
    pub fn scroll_by(&mut self, delta: i64) {
        let target = (self.scroll as i64 + delta).clamp(0, self.max_scroll() as i64);
        if target as u32 != self.scroll {
            self.scroll = target as u32;
            self.update_reveal();
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.grid = CardGrid::new(self.cards.len(), width);
        self.scroll = self.scroll.min(self.max_scroll());
        self.update_reveal();
    }

    /// One visibility tick from the current viewport
    fn update_reveal(&mut self) {
        let viewport = layout::viewport(self.width, self.height, self.scroll);
        let grid = &self.grid;
        let revealed = self.reveal.poll(&viewport, |index| Some(grid.document_rect(*index)));
        for card in revealed {
            log::debug!("card {} revealed", card.handle());
        }
    }

    /// Pointer moved to a screen cell
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let hit = self.grid.hit_test(column, row, self.scroll);
        let previous = self.focus.current();

        if let Some(previous) = previous.filter(|&p| Some(p) != hit) {
            self.pointer_left(previous);
        }

        let Some(index) = hit else {
            return;
        };
        self.focus.on_enter(index);

        let bounds = self.grid.client_rect(index, self.scroll);
        if let Some(transform) = self.tilt.pointer_move(&index, bounds, layout::cell_center(column, row)) {
            self.transforms[index] = transform;
        }
    }

    fn pointer_left(&mut self, index: usize) {
        self.focus.on_leave(index);
        if let Some(transform) = self.tilt.pointer_leave(&index) {
            self.transforms[index] = transform;
        }
    }

    pub fn render(&self, renderer: &mut CardRenderer) {
        renderer.clear();
        for index in 0..self.grid.len() {
            let style = CardStyle {
                title: card_title(index),
                revealed: self.cards[index].is_revealed(),
                focused: self.focus.is_focused(index),
                transform: self.transforms[index],
            };
            renderer.draw_card(&self.grid.cell_rect(index), self.scroll, &style);
        }
    }

    /// Release both engines
    pub fn teardown(&mut self) {
        self.reveal.teardown();
        self.tilt.teardown();
    }
}

/// Main application struct for the terminal host
pub struct TerminalApp {
    scene: CardScene,
    renderer: CardRenderer,
    running: bool,
}

impl TerminalApp {
    pub fn new(config: EngineConfig, card_count: usize) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene: CardScene::new(config, card_count, width, height),
            renderer: CardRenderer::new(width as usize, height as usize),
            running: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        self.scene.teardown();
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;

        while self.running {
            // Each event is handled and drawn before the next is read
            if event::poll(Duration::from_millis(250))? {
                self.handle_input()?;
                self.render()?;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('j') | KeyCode::Down => self.scene.scroll_by(1),
                KeyCode::Char('k') | KeyCode::Up => self.scene.scroll_by(-1),
                KeyCode::PageDown | KeyCode::Char(' ') => self.scene.scroll_by(10),
                KeyCode::PageUp => self.scene.scroll_by(-10),
                _ => {}
            },
            Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => self.scene.pointer_moved(column, row),
                MouseEventKind::ScrollDown => self.scene.scroll_by(3),
                MouseEventKind::ScrollUp => self.scene.scroll_by(-3),
                _ => {}
            },
            Event::Resize(width, height) => {
                self.scene.resize(width, height);
                self.renderer = CardRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.scene.render(&mut self.renderer);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status line over the header row
        let focus = match self.scene.focused() {
            Some(index) => format!("card {}", index + 1),
            None => "none".to_string(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Vista | revealed {}/{} | focus: {} | j/k/wheel=scroll q=quit",
                self.scene.revealed_count(),
                self.scene.grid.len(),
                focus
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
