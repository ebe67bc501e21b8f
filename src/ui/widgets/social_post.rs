use crate::generation::{GenerationData, GenerationRequest, HeroImage};
use crate::options::{cycle, InputType, Length, Platform, Tone};
use crate::ui::widgets::{option_row, section_title, spinner_frame, ToolWidget};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::any::Any;
use std::time::{Duration, Instant};

pub const TOOL_ID: &str = "social-post-writer";

const VALIDATION_ERROR: &str = "Please enter a topic or URL.";
const UNKNOWN_ERROR: &str = "An unknown error occurred.";
const COPIED_FEEDBACK: Duration = Duration::from_secs(2);
const PREVIEW_WIDTH: u32 = 40;

/// What the app loop should do after a key press inside the tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    None,
    SubmitPost(GenerationRequest),
    SubmitHeroImage(String),
    LeaveTool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormSection {
    InputType,
    Input,
    Platform,
    Tone,
    Length,
}

impl FormSection {
    const ORDER: [FormSection; 5] = [
        FormSection::InputType,
        FormSection::Input,
        FormSection::Platform,
        FormSection::Tone,
        FormSection::Length,
    ];
}

/// Downscaled hero image kept alongside the data URL for rendering.
struct HeroPreview {
    #[allow(dead_code)] // Preserved for a future save-to-file action
    data_url: String,
    pixels: Vec<Vec<(u8, u8, u8)>>,
}

pub struct SocialPostWidget {
    focus: FormSection,
    input_type: InputType,
    input_value: String,
    platform: Platform,
    tone: Tone,
    length: Length,

    generated_content: String,
    is_generating: bool,
    error: Option<String>,

    hero_preview: Option<HeroPreview>,
    is_generating_hero_image: bool,
    hero_image_error: Option<String>,

    copied_at: Option<Instant>,
    status: Option<String>,
    tick_count: usize,
    output_scroll: u16,
}

impl Default for SocialPostWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl SocialPostWidget {
    pub fn new() -> Self {
        Self {
            focus: FormSection::Input,
            input_type: InputType::Topic,
            input_value: String::new(),
            platform: Platform::LinkedIn,
            tone: Tone::Professional,
            length: Length::Medium,
            generated_content: String::new(),
            is_generating: false,
            error: None,
            hero_preview: None,
            is_generating_hero_image: false,
            hero_image_error: None,
            copied_at: None,
            status: None,
            tick_count: 0,
            output_scroll: 0,
        }
    }

    /// Validate and start a primary generation. Returns the request
    /// descriptor to dispatch, or `None` when the input is blank (a
    /// validation error is set instead) or a request is already in flight.
    pub fn begin_generate(&mut self) -> Option<GenerationRequest> {
        if self.is_generating {
            return None;
        }

        if self.input_value.trim().is_empty() {
            self.error = Some(VALIDATION_ERROR.to_string());
            return None;
        }

        self.is_generating = true;
        self.error = None;
        self.generated_content.clear();
        self.hero_preview = None;
        self.hero_image_error = None;
        self.output_scroll = 0;

        Some(GenerationRequest {
            input_type: self.input_type,
            input_value: self.input_value.clone(),
            platform: self.platform,
            tone: self.tone,
            length: self.length,
        })
    }

    pub fn content(&self) -> &str {
        &self.generated_content
    }

    pub fn can_generate_hero_image(&self) -> bool {
        self.platform == Platform::Blog
            && !self.generated_content.is_empty()
            && !self.is_generating
            && !self.is_generating_hero_image
    }

    /// Start a hero-image generation for the existing content. Leaves the
    /// primary text untouched.
    pub fn begin_hero_image(&mut self) -> Option<String> {
        if !self.can_generate_hero_image() {
            return None;
        }

        self.is_generating_hero_image = true;
        self.hero_image_error = None;

        Some(self.generated_content.clone())
    }

    pub fn copy_content(&mut self) {
        if self.generated_content.is_empty() || self.is_generating {
            return;
        }

        match arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(self.generated_content.clone()))
        {
            Ok(()) => self.note_copied(),
            Err(e) => self.status = Some(format!("Clipboard unavailable: {}", e)),
        }
    }

    fn note_copied(&mut self) {
        self.copied_at = Some(Instant::now());
        self.status = None;
    }

    fn copied(&self) -> bool {
        self.copied_at
            .is_some_and(|at| at.elapsed() < COPIED_FEEDBACK)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ToolAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('g') => {
                    if let Some(content) = self.begin_hero_image() {
                        return ToolAction::SubmitHeroImage(content);
                    }
                    return ToolAction::None;
                }
                KeyCode::Char('y') => {
                    self.copy_content();
                    return ToolAction::None;
                }
                KeyCode::Char('u') => {
                    if self.focus == FormSection::Input {
                        self.input_value.clear();
                    }
                    return ToolAction::None;
                }
                _ => return ToolAction::None,
            }
        }

        match key.code {
            KeyCode::Esc => ToolAction::LeaveTool,
            KeyCode::Enter => {
                if let Some(request) = self.begin_generate() {
                    ToolAction::SubmitPost(request)
                } else {
                    ToolAction::None
                }
            }
            KeyCode::Tab => {
                self.focus_next(true);
                ToolAction::None
            }
            KeyCode::BackTab => {
                self.focus_next(false);
                ToolAction::None
            }
            KeyCode::Up => {
                self.scroll_up();
                ToolAction::None
            }
            KeyCode::Down => {
                self.scroll_down();
                ToolAction::None
            }
            KeyCode::Left => {
                self.cycle_focused(false);
                ToolAction::None
            }
            KeyCode::Right => {
                self.cycle_focused(true);
                ToolAction::None
            }
            KeyCode::Backspace => {
                if self.focus == FormSection::Input {
                    self.input_value.pop();
                }
                ToolAction::None
            }
            KeyCode::Char(c) => {
                if self.focus == FormSection::Input {
                    self.input_value.push(c);
                }
                ToolAction::None
            }
            _ => ToolAction::None,
        }
    }

    fn focus_next(&mut self, forward: bool) {
        self.focus = cycle(&FormSection::ORDER, self.focus, forward);
    }

    fn cycle_focused(&mut self, forward: bool) {
        match self.focus {
            FormSection::InputType => self.input_type = self.input_type.toggle(),
            FormSection::Input => {}
            FormSection::Platform => {
                self.platform = cycle(&Platform::ALL, self.platform, forward)
            }
            FormSection::Tone => self.tone = cycle(&Tone::ALL, self.tone, forward),
            FormSection::Length => self.length = cycle(&Length::ALL, self.length, forward),
        }
    }

    fn generate_enabled(&self) -> bool {
        !self.input_value.trim().is_empty() && !self.is_generating
    }

    fn build_hero_preview(image: HeroImage) -> Result<HeroPreview, String> {
        let decoded = image::load_from_memory(&image.bytes).map_err(|e| e.to_string())?;

        let width = decoded.width().min(PREVIEW_WIDTH).max(1);
        // Terminal cells are roughly twice as tall as wide; halve the rows.
        let height =
            ((decoded.height() as f64 / decoded.width() as f64) * width as f64 / 2.0).max(1.0)
                as u32;

        let resized =
            decoded.resize_exact(width, height, image::imageops::FilterType::Triangle);
        let rgb = resized.to_rgb8();

        let mut pixels = Vec::with_capacity(height as usize);
        for y in 0..height {
            let mut row = Vec::with_capacity(width as usize);
            for x in 0..width {
                let p = rgb.get_pixel(x, y);
                row.push((p[0], p[1], p[2]));
            }
            pixels.push(row);
        }

        Ok(HeroPreview {
            data_url: image.data_url,
            pixels,
        })
    }
}

impl ToolWidget for SocialPostWidget {
    fn id(&self) -> String {
        TOOL_ID.to_string()
    }

    fn title(&self) -> &str {
        "Social Post Writer"
    }

    fn tagline(&self) -> &str {
        "Generate engaging content for your social platforms in seconds"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.render_form(frame, panes[0]);
        self.render_output(frame, panes[1]);
    }

    fn update_data(&mut self, data: GenerationData) {
        match data {
            GenerationData::Post(content) => {
                self.is_generating = false;
                self.error = None;
                self.generated_content = content;
            }
            GenerationData::PostFailed(message) => {
                self.is_generating = false;
                self.generated_content.clear();
                self.error = Some(non_blank_message(message));
            }
            GenerationData::HeroImage(image) => {
                self.is_generating_hero_image = false;
                match Self::build_hero_preview(image) {
                    Ok(preview) => {
                        self.hero_image_error = None;
                        self.hero_preview = Some(preview);
                    }
                    Err(e) => {
                        self.hero_preview = None;
                        self.hero_image_error =
                            Some(format!("Could not decode the generated image: {}", e));
                    }
                }
            }
            GenerationData::HeroImageFailed(message) => {
                self.is_generating_hero_image = false;
                self.hero_preview = None;
                self.hero_image_error = Some(non_blank_message(message));
            }
        }
    }

    fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.copied_at.is_some_and(|at| at.elapsed() >= COPIED_FEEDBACK) {
            self.copied_at = None;
        }
    }

    fn scroll_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        self.output_scroll = self.output_scroll.saturating_add(1);
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

fn non_blank_message(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

impl SocialPostWidget {
    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(" Social Post Writer ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();

        lines.push(section_title(
            1,
            "Provide Context",
            self.focus == FormSection::InputType || self.focus == FormSection::Input,
        ));
        lines.push(option_row(
            InputType::ALL.iter().map(|t| t.label()),
            self.input_type.label(),
            self.focus == FormSection::InputType,
        ));
        lines.push(Line::from(""));
        lines.push(self.input_line());
        lines.push(Line::from(""));

        lines.push(section_title(
            2,
            "Choose Platform",
            self.focus == FormSection::Platform,
        ));
        lines.push(option_row(
            Platform::ALL.iter().map(|p| p.label()),
            self.platform.label(),
            self.focus == FormSection::Platform,
        ));
        lines.push(Line::from(""));

        lines.push(section_title(3, "Set Attributes", self.focus == FormSection::Tone));
        lines.push(Line::from(Span::styled(
            "Tone of Voice",
            Style::default().fg(Color::Gray),
        )));
        lines.push(option_row(
            Tone::ALL.iter().map(|t| t.label()),
            self.tone.label(),
            self.focus == FormSection::Tone,
        ));
        lines.push(Line::from(Span::styled(
            "Length",
            Style::default().fg(Color::Gray),
        )));
        lines.push(option_row(
            Length::ALL.iter().map(|l| l.label()),
            self.length.label(),
            self.focus == FormSection::Length,
        ));
        lines.push(Line::from(""));

        lines.push(self.generate_line());
        lines.push(Line::from(Span::styled(
            "Tab: next field | ←→: change option | Esc: dashboard",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn input_line(&self) -> Line<'_> {
        let focused = self.focus == FormSection::Input;
        let marker = if focused { "> " } else { "  " };

        if self.input_value.is_empty() {
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    self.input_type.placeholder(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(self.input_value.as_str(), Style::default().fg(Color::White)),
            ])
        }
    }

    fn generate_line(&self) -> Line<'static> {
        let (label, style) = if self.is_generating {
            (
                format!("{} Generating...", spinner_frame(self.tick_count)),
                Style::default().fg(Color::Cyan),
            )
        } else if self.generate_enabled() {
            (
                "[Enter] Generate Post".to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                "[Enter] Generate Post".to_string(),
                Style::default().fg(Color::DarkGray),
            )
        };
        Line::from(Span::styled(label, style))
    }

    fn render_output(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(" Generated Content ")
            .title_bottom(self.output_hints());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();

        // Hero image section first, matching the original layout order.
        if self.is_generating_hero_image {
            lines.push(Line::from(Span::styled(
                format!("{} Generating hero image...", spinner_frame(self.tick_count)),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(""));
        }
        if let Some(ref error) = self.hero_image_error {
            lines.push(Line::from(Span::styled(
                "Image Generation Failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(""));
        }
        if let Some(ref preview) = self.hero_preview {
            for row in &preview.pixels {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|&(r, g, b)| {
                        Span::styled("█", Style::default().fg(Color::Rgb(r, g, b)))
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
        }

        // Then the primary content slot.
        if self.is_generating {
            lines.push(Line::from(Span::styled(
                format!("{} Crafting your social post...", spinner_frame(self.tick_count)),
                Style::default().fg(Color::Cyan),
            )));
        } else if let Some(ref error) = self.error {
            lines.push(Line::from(Span::styled(
                "Generation Failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else if !self.generated_content.is_empty() {
            let width = inner.width.saturating_sub(1).max(20) as usize;
            for wrapped in textwrap::wrap(&self.generated_content, width) {
                lines.push(Line::from(wrapped.into_owned()));
            }
        } else if !self.is_generating_hero_image && self.hero_preview.is_none() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Your generated post will appear here.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        if let Some(ref status) = self.status {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.output_scroll, 0));
        frame.render_widget(paragraph, inner);
    }

    fn output_hints(&self) -> Line<'static> {
        let mut spans = Vec::new();

        if self.copied() {
            spans.push(Span::styled(
                " Copied! ",
                Style::default().fg(Color::Green),
            ));
        } else if !self.generated_content.is_empty() && !self.is_generating {
            spans.push(Span::styled(
                " Ctrl+Y: copy ",
                Style::default().fg(Color::Gray),
            ));
        }

        if self.can_generate_hero_image() {
            spans.push(Span::styled(
                " Ctrl+G: hero image ",
                Style::default().fg(Color::Gray),
            ));
        }

        Line::from(spans)
    }
}
