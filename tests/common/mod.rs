// ABOUTME: Recording fakes for the host interfaces, shared by the dispatcher integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use gatsby_hub::config::AppConfig;
use gatsby_hub::dispatcher::Dispatcher;
use gatsby_hub::host::{
    HostServices, InstallHintSource, Notifier, PromptProvider, Secret, StatusIndicator,
    TerminalError, TerminalHandle, TerminalHost, WorkspaceInspector,
};
use gatsby_hub::models::PackageLinks;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Something the dispatcher did to a terminal. Revealing a terminal is
/// tracked separately since it has no effect on what runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEffect {
    Sent { terminal: String, text: String },
    SecretAnswered { terminal: String, secret: String },
    Disposed { terminal: String },
}

#[derive(Default)]
pub struct TerminalLog {
    pub effects: Mutex<Vec<TerminalEffect>>,
    pub shown: Mutex<Vec<String>>,
    /// Every terminal call and prompt in the order they happened.
    pub steps: Mutex<Vec<String>>,
}

impl TerminalLog {
    pub fn step(&self, step: &str) {
        self.steps.lock().unwrap().push(step.to_string());
    }

    pub fn steps(&self) -> Vec<String> {
        self.steps.lock().unwrap().clone()
    }

    pub fn effects(&self) -> Vec<TerminalEffect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                TerminalEffect::Sent { text, .. } => Some(text),
                TerminalEffect::SecretAnswered { .. } | TerminalEffect::Disposed { .. } => None,
            })
            .collect()
    }
}

pub struct RecordingTerminal {
    name: String,
    log: Arc<TerminalLog>,
}

impl TerminalHandle for RecordingTerminal {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_text(&self, text: &str) -> Result<(), TerminalError> {
        self.log.step("send");
        self.log.effects.lock().unwrap().push(TerminalEffect::Sent {
            terminal: self.name.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn send_secret(&self, secret: Secret) -> Result<(), TerminalError> {
        self.log.step("secret");
        self.log.effects.lock().unwrap().push(TerminalEffect::SecretAnswered {
            terminal: self.name.clone(),
            secret: secret.expose(),
        });
        Ok(())
    }

    fn show(&self) -> Result<(), TerminalError> {
        self.log.step("show");
        self.log.shown.lock().unwrap().push(self.name.clone());
        Ok(())
    }

    fn dispose(&self) -> Result<(), TerminalError> {
        self.log.step("dispose");
        self.log.effects.lock().unwrap().push(TerminalEffect::Disposed {
            terminal: self.name.clone(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTerminalHost {
    pub log: Arc<TerminalLog>,
}

impl TerminalHost for RecordingTerminalHost {
    fn get_or_create_terminal(&self, name: &str) -> Result<Arc<dyn TerminalHandle>, TerminalError> {
        Ok(Arc::new(RecordingTerminal {
            name: name.to_string(),
            log: self.log.clone(),
        }))
    }
}

pub struct FakeWorkspace {
    pub initialized: bool,
    pub root: Option<PathBuf>,
}

impl WorkspaceInspector for FakeWorkspace {
    fn is_initialized_project(&self) -> bool {
        self.initialized
    }

    fn root_path(&self) -> Option<PathBuf> {
        self.root.clone()
    }
}

/// Answers every prompt from a fixed script and remembers what was asked.
#[derive(Default)]
pub struct ScriptedPrompts {
    pub text: Option<String>,
    pub secret: Option<String>,
    pub choice: Option<String>,
    pub asked: Mutex<Vec<String>>,
    /// Set by the harness so prompts show up in the terminal step order.
    pub steps: Option<Arc<TerminalLog>>,
}

impl ScriptedPrompts {
    fn ask(&self, question: &str) {
        if let Some(log) = &self.steps {
            log.step("prompt");
        }
        self.asked.lock().unwrap().push(question.to_string());
    }
}

#[async_trait]
impl PromptProvider for ScriptedPrompts {
    async fn prompt_text(&self, placeholder: &str) -> Option<String> {
        self.ask(placeholder);
        self.text.clone()
    }

    async fn prompt_secret(&self, placeholder: &str) -> Option<Secret> {
        self.ask(placeholder);
        self.secret.clone().map(Secret::new)
    }

    async fn prompt_choice(&self, message: &str, _options: &[&str]) -> Option<String> {
        self.ask(message);
        self.choice.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Info(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Error(message.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Working(String),
    Offline(u16),
    Online,
    Disposed,
}

#[derive(Default)]
pub struct RecordingStatus {
    pub updates: Mutex<Vec<StatusUpdate>>,
}

impl RecordingStatus {
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// Updates other than the transient working labels.
    pub fn settled(&self) -> Vec<StatusUpdate> {
        self.updates()
            .into_iter()
            .filter(|update| !matches!(update, StatusUpdate::Working(_)))
            .collect()
    }
}

impl StatusIndicator for RecordingStatus {
    fn set_working(&self, label: &str) {
        self.updates
            .lock()
            .unwrap()
            .push(StatusUpdate::Working(label.to_string()));
    }

    fn set_offline(&self, port: u16) {
        self.updates.lock().unwrap().push(StatusUpdate::Offline(port));
    }

    fn set_online(&self) {
        self.updates.lock().unwrap().push(StatusUpdate::Online);
    }

    fn dispose(&self) {
        self.updates.lock().unwrap().push(StatusUpdate::Disposed);
    }
}

pub struct FixedHint(pub Option<String>);

#[async_trait]
impl InstallHintSource for FixedHint {
    async fn resolve_install_hint(&self, _links: &PackageLinks) -> Option<String> {
        self.0.clone()
    }
}

/// A dispatcher wired to recording fakes, with handles to inspect them.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub terminals: Arc<TerminalLog>,
    pub prompts: Arc<ScriptedPrompts>,
    pub notifier: Arc<RecordingNotifier>,
    pub status: Arc<RecordingStatus>,
}

pub struct HarnessBuilder {
    config: AppConfig,
    initialized: bool,
    root: Option<PathBuf>,
    prompts: ScriptedPrompts,
    hint: Option<String>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            initialized: true,
            root: Some(PathBuf::from("/sites/blog")),
            prompts: ScriptedPrompts::default(),
            hint: None,
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// A folder that is not a gatsby site.
    pub fn empty_workspace(mut self) -> Self {
        self.initialized = false;
        self
    }

    pub fn no_workspace(mut self) -> Self {
        self.initialized = false;
        self.root = None;
        self
    }

    pub fn prompts(mut self, prompts: ScriptedPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    pub fn build(self) -> Harness {
        let terminals = RecordingTerminalHost::default();
        let log = terminals.log.clone();
        let mut prompts = self.prompts;
        prompts.steps = Some(log.clone());
        let prompts = Arc::new(prompts);
        let notifier = Arc::new(RecordingNotifier::default());
        let status = Arc::new(RecordingStatus::default());

        let host = HostServices {
            terminals: Arc::new(terminals),
            workspace: Arc::new(FakeWorkspace {
                initialized: self.initialized,
                root: self.root,
            }),
            prompts: prompts.clone(),
            notifier: notifier.clone(),
            status: status.clone(),
            hints: Arc::new(FixedHint(self.hint)),
        };

        Harness {
            dispatcher: Dispatcher::new(self.config, host),
            terminals: log,
            prompts,
            notifier,
            status,
        }
    }
}
