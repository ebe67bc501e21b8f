use crate::config::Config;
use crate::generation::gemini::GeminiGenerator;
use crate::generation::{GenerationData, GenerationMessage, GenerationRequest, Generator};
use crate::ui;
use crate::ui::widgets::social_post::{SocialPostWidget, ToolAction};
use crate::ui::widgets::ToolWidget;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Tool,
}

pub struct App {
    pub screen: Screen,
    pub tools: Vec<Box<dyn ToolWidget>>,
    pub selected_tool: usize,
    pub has_api_key: bool,
    generator: Arc<dyn Generator>,
    tx: mpsc::UnboundedSender<GenerationMessage>,
    rx: mpsc::UnboundedReceiver<GenerationMessage>,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_generator(config, Arc::new(GeminiGenerator::new(config)))
    }

    pub fn with_generator(config: &Config, generator: Arc<dyn Generator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            screen: Screen::Dashboard,
            tools: vec![Box::new(SocialPostWidget::new())],
            selected_tool: 0,
            has_api_key: config.has_api_key(),
            generator,
            tx,
            rx,
            should_quit: false,
            tick_rate: Duration::from_millis(config.tick_rate_ms.max(50)),
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.drain_messages();
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            } else {
                for tool in &mut self.tools {
                    tool.tick();
                }
            }
        }

        Ok(())
    }

    /// Apply completed background generations to their owning tools.
    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            if let Some(tool) = self.tools.iter_mut().find(|t| t.id() == message.tool_id) {
                tool.update_data(message.data);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Tool => self.handle_tool_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_tool = self.selected_tool.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_tool + 1 < self.tools.len() {
                    self.selected_tool += 1;
                }
            }
            KeyCode::Enter => self.screen = Screen::Tool,
            _ => {}
        }
    }

    fn handle_tool_key(&mut self, key: KeyEvent) {
        let tool_id = self.tools[self.selected_tool].id();

        let action = match self.tools[self.selected_tool]
            .as_any_mut()
            .and_then(|a| a.downcast_mut::<SocialPostWidget>())
        {
            Some(widget) => widget.handle_key(key),
            None => ToolAction::None,
        };

        match action {
            ToolAction::SubmitPost(request) => self.dispatch_post(tool_id, request),
            ToolAction::SubmitHeroImage(content) => self.dispatch_hero_image(tool_id, content),
            ToolAction::LeaveTool => self.screen = Screen::Dashboard,
            ToolAction::None => {}
        }
    }

    /// Spawn the single-shot post generation for an accepted submission.
    fn dispatch_post(&self, tool_id: String, request: GenerationRequest) {
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let data = match generator.generate_social_post(&request).await {
                Ok(content) => GenerationData::Post(content),
                Err(e) => GenerationData::PostFailed(e.to_string()),
            };
            let _ = tx.send(GenerationMessage { tool_id, data });
        });
    }

    fn dispatch_hero_image(&self, tool_id: String, content: String) {
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let data = match generator.generate_blog_hero_image(&content).await {
                Ok(image) => GenerationData::HeroImage(image),
                Err(e) => GenerationData::HeroImageFailed(e.to_string()),
            };
            let _ = tx.send(GenerationMessage { tool_id, data });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{GenerationError, HeroImage};
    use crate::options::{InputType, Length, Platform, Tone};
    use crate::ui::widgets::social_post;
    use async_trait::async_trait;

    struct StubGenerator {
        fail: bool,
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate_social_post(
            &self,
            request: &GenerationRequest,
        ) -> Result<String, GenerationError> {
            if self.fail {
                Err(GenerationError::Status {
                    status: 500,
                    body: "backend on fire".to_string(),
                })
            } else {
                Ok(format!("post about {}", request.input_value))
            }
        }

        async fn generate_blog_hero_image(
            &self,
            _content: &str,
        ) -> Result<HeroImage, GenerationError> {
            if self.fail {
                Err(GenerationError::EmptyResponse)
            } else {
                Ok(HeroImage {
                    data_url: "data:image/png;base64,aGVsbG8=".to_string(),
                    bytes: b"hello".to_vec(),
                })
            }
        }
    }

    fn example_request() -> GenerationRequest {
        GenerationRequest {
            input_type: InputType::Topic,
            input_value: "benefits of a productivity app".to_string(),
            platform: Platform::LinkedIn,
            tone: Tone::Professional,
            length: Length::Medium,
        }
    }

    fn app(fail: bool) -> App {
        App::with_generator(&Config::default(), Arc::new(StubGenerator { fail }))
    }

    #[tokio::test]
    async fn test_dispatch_post_delivers_success() {
        let mut app = app(false);
        app.dispatch_post(social_post::TOOL_ID.to_string(), example_request());

        let message = app.rx.recv().await.unwrap();
        assert_eq!(message.tool_id, social_post::TOOL_ID);
        match message.data {
            GenerationData::Post(content) => {
                assert_eq!(content, "post about benefits of a productivity app");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_post_delivers_failure_message() {
        let mut app = app(true);
        app.dispatch_post(social_post::TOOL_ID.to_string(), example_request());

        let message = app.rx.recv().await.unwrap();
        match message.data {
            GenerationData::PostFailed(text) => {
                assert!(text.contains("500"));
                assert!(text.contains("backend on fire"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_hero_image_delivers_failure() {
        let mut app = app(true);
        app.dispatch_hero_image(social_post::TOOL_ID.to_string(), "article".to_string());

        let message = app.rx.recv().await.unwrap();
        assert!(matches!(message.data, GenerationData::HeroImageFailed(_)));
    }

    #[test]
    fn test_drain_routes_by_tool_id() {
        let mut app = app(false);
        app.tx
            .send(GenerationMessage {
                tool_id: social_post::TOOL_ID.to_string(),
                data: GenerationData::Post("routed".to_string()),
            })
            .unwrap();
        app.tx
            .send(GenerationMessage {
                tool_id: "unknown-tool".to_string(),
                data: GenerationData::Post("dropped".to_string()),
            })
            .unwrap();

        app.drain_messages();

        let widget = app.tools[0]
            .as_any()
            .and_then(|a| a.downcast_ref::<SocialPostWidget>())
            .unwrap();
        assert_eq!(widget.content(), "routed");
    }

    #[test]
    fn test_dashboard_enter_opens_tool_and_escape_returns() {
        let mut app = app(false);
        assert_eq!(app.screen, Screen::Dashboard);

        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Tool);

        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_dashboard_q_quits() {
        let mut app = app(false);
        app.handle_key(KeyEvent::from(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
