//! Application state and logic
//!
//! Key handling is split in two: [`App::handle_key`] updates local state and
//! returns the [`Action`] that needs the server, and [`App::perform`] runs
//! that action against the API and folds the response back into the view.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use media_core::{Entry, NewEntry};

use crate::client::ApiClient;

/// Category filters, in selector order
pub const CATEGORIES: [&str; 4] = ["All", "Books", "Movies", "Magazines"];

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Table navigation
    Normal,
    /// Typing a name to search for (after pressing /)
    Search,
    /// Filling in the new entry form
    Form,
    /// Waiting for y/n on a delete
    ConfirmDelete,
}

/// Modal dialog shown over the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Info(String),
    Warning(String),
    Error(String),
    Details(Entry),
}

/// Work that needs a round trip to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Switch to "All" and list everything
    LoadAll,
    /// List the selected category
    LoadCategory,
    /// Look up the name in the search input
    Search,
    /// Fetch an entry by id for the details dialog
    ShowDetails(String),
    /// Create the entry from the form
    Submit(NewEntry),
    /// Delete an entry by id
    Delete(String),
}

/// New entry form
#[derive(Debug, Default, Clone)]
pub struct EntryForm {
    /// name, author, date, category
    pub fields: [String; 4],
    /// Index of the focused field
    pub focus: usize,
}

impl EntryForm {
    pub const LABELS: [&'static str; 4] = ["Name", "Author", "Date (DD-MM-YYYY)", "Category"];

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.fields[self.focus].push(c);
    }

    pub fn delete_char(&mut self) {
        self.fields[self.focus].pop();
    }

    /// Build the creation payload
    pub fn to_new_entry(&self) -> NewEntry {
        let [name, author, date, category] = &self.fields;
        NewEntry::new(name.trim(), author.trim(), date.trim(), category.trim())
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Rows of the table, as last returned by the server
    pub entries: Vec<Entry>,
    /// Currently selected row
    pub selected: usize,
    /// Index into [`CATEGORIES`]
    pub category_index: usize,
    /// Search input buffer
    pub search_input: String,
    /// New entry form
    pub form: EntryForm,
    /// Entry awaiting delete confirmation
    pub pending_delete: Option<Entry>,
    /// Modal dialog, dismissed by any key
    pub dialog: Option<Dialog>,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether a request is in flight
    pub is_loading: bool,
    /// Server the client talks to, shown in the title
    pub server_url: String,
}

impl App {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            entries: Vec::new(),
            selected: 0,
            category_index: 0,
            search_input: String::new(),
            form: EntryForm::default(),
            pending_delete: None,
            dialog: None,
            status_message: None,
            status_message_time: None,
            show_help: false,
            is_loading: false,
            server_url: server_url.into(),
        }
    }

    /// Name of the selected category
    pub fn current_category(&self) -> &'static str {
        CATEGORIES[self.category_index]
    }

    /// Get the currently selected entry
    pub fn current_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected < self.entries.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    pub fn next_category(&mut self) {
        self.category_index = (self.category_index + 1) % CATEGORIES.len();
    }

    pub fn prev_category(&mut self) {
        self.category_index = (self.category_index + CATEGORIES.len() - 1) % CATEGORIES.len();
    }

    /// Replace the table rows, keeping the selection in bounds
    pub fn show_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        if self.entries.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.entries.len() - 1);
        }
    }

    /// Handle a key press
    ///
    /// Returns the server action the key asks for, if any.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        // Any key dismisses a dialog or the help overlay
        if self.dialog.is_some() {
            self.dialog = None;
            return None;
        }
        if self.show_help {
            self.show_help = false;
            return None;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::Search => self.handle_search_key(code),
            InputMode::Form => self.handle_form_key(code),
            InputMode::ConfirmDelete => self.handle_confirm_key(code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('g') | KeyCode::Home => self.move_to_first(),
            KeyCode::Char('G') | KeyCode::End => self.move_to_last(),
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
                self.next_category();
                return Some(Action::LoadCategory);
            }
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
                self.prev_category();
                return Some(Action::LoadCategory);
            }
            KeyCode::Char('r') => return Some(Action::LoadAll),
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search_input.clear();
            }
            KeyCode::Enter => {
                if let Some(entry) = self.current_entry() {
                    return Some(Action::ShowDetails(entry.id.clone()));
                }
            }
            KeyCode::Char('a') => {
                self.form = EntryForm::default();
                self.input_mode = InputMode::Form;
            }
            KeyCode::Char('d') => match self.current_entry().cloned() {
                Some(entry) => {
                    self.pending_delete = Some(entry);
                    self.input_mode = InputMode::ConfirmDelete;
                }
                None => {
                    self.dialog = Some(Dialog::Warning("Please select an entry.".to_string()));
                }
            },
            KeyCode::Char('?') => self.toggle_help(),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if self.search_input.trim().is_empty() {
                    self.dialog = Some(Dialog::Info("Please enter a name.".to_string()));
                } else {
                    return Some(Action::Search);
                }
            }
            KeyCode::Char(c) => self.search_input.push(c),
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Enter => {
                let new = self.form.to_new_entry();
                if !new.is_complete() {
                    self.dialog = Some(Dialog::Error("Fill in all fields!".to_string()));
                    return None;
                }
                self.input_mode = InputMode::Normal;
                return Some(Action::Submit(new));
            }
            KeyCode::Char(c) => self.form.insert_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.input_mode = InputMode::Normal;
                self.pending_delete
                    .take()
                    .map(|entry| Action::Delete(entry.id))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.pending_delete = None;
                None
            }
            _ => None,
        }
    }

    /// Run an action against the server
    ///
    /// Network failures abandon the action and open an error dialog.
    pub async fn perform(&mut self, action: Action, client: &ApiClient) {
        let result = match action {
            Action::LoadAll => self.load_all(client).await,
            Action::LoadCategory => self.load_category(client).await,
            Action::Search => self.search(client).await,
            Action::ShowDetails(id) => self.show_details(client, &id).await,
            Action::Submit(new) => self.submit(client, new).await,
            Action::Delete(id) => self.delete(client, &id).await,
        };
        self.is_loading = false;

        if let Err(e) = result {
            self.dialog = Some(Dialog::Error(format!("{:#}", e)));
        }
    }

    /// Select "All" and list every entry
    pub async fn load_all(&mut self, client: &ApiClient) -> Result<()> {
        self.category_index = 0;
        let entries = client.list_all().await?;
        self.show_entries(entries);
        Ok(())
    }

    async fn load_category(&mut self, client: &ApiClient) -> Result<()> {
        let entries = match self.current_category() {
            "All" => client.list_all().await?,
            category => client.list_by_category(category).await?,
        };
        self.show_entries(entries);
        Ok(())
    }

    async fn search(&mut self, client: &ApiClient) -> Result<()> {
        let name = self.search_input.trim().to_string();
        match client.search_by_name(&name).await? {
            Some(entry) => {
                self.selected = 0;
                self.show_entries(vec![entry]);
            }
            None => self.dialog = Some(Dialog::Info("No media found.".to_string())),
        }
        Ok(())
    }

    async fn show_details(&mut self, client: &ApiClient, id: &str) -> Result<()> {
        self.dialog = Some(match client.get_by_id(id).await? {
            Some(entry) => Dialog::Details(entry),
            None => Dialog::Info("Entry no longer exists.".to_string()),
        });
        Ok(())
    }

    async fn submit(&mut self, client: &ApiClient, new: NewEntry) -> Result<()> {
        match client.create(&new).await? {
            Some(entry) => self.set_status(format!("Added '{}'", entry.name)),
            None => self.dialog = Some(Dialog::Error("Server refused the entry.".to_string())),
        }
        self.form = EntryForm::default();
        self.load_all(client).await
    }

    async fn delete(&mut self, client: &ApiClient, id: &str) -> Result<()> {
        if client.delete(id).await? {
            self.set_status("Entry deleted");
        } else {
            self.dialog = Some(Dialog::Info("Entry was already removed.".to_string()));
        }
        self.load_all(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_core::Store;
    use media_server::AppState;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        app.handle_key(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn entry(id: &str, name: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: name.to_string(),
            author: "Herbert".to_string(),
            date: "01-01-1965".to_string(),
            category: "Books".to_string(),
        }
    }

    async fn spawn_test_server(temp_dir: &TempDir) -> ApiClient {
        let store = Store::open(temp_dir.path().join("media.json")).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(media_server::serve(
            listener,
            AppState::new(store),
            std::future::pending(),
        ));
        ApiClient::new(&format!("http://127.0.0.1:{}", port)).unwrap()
    }

    #[test]
    fn test_category_cycle() {
        let mut app = App::new("http://127.0.0.1:5000");
        assert_eq!(app.current_category(), "All");

        assert_eq!(press(&mut app, KeyCode::Tab), Some(Action::LoadCategory));
        assert_eq!(app.current_category(), "Books");

        app.prev_category();
        app.prev_category();
        assert_eq!(app.current_category(), "Magazines");
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = App::new("");
        app.move_down();
        assert_eq!(app.selected, 0);

        app.show_entries(vec![entry("1", "Dune"), entry("2", "Emma")]);
        app.move_to_last();
        assert_eq!(app.selected, 1);
        app.move_down();
        assert_eq!(app.selected, 1);

        app.show_entries(vec![entry("1", "Dune")]);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_empty_search_shows_info() {
        let mut app = App::new("");
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        type_text(&mut app, "  ");
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert_eq!(
            app.dialog,
            Some(Dialog::Info("Please enter a name.".to_string()))
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_form_refuses_incomplete_entry() {
        let mut app = App::new("");
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::Form);

        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Herbert");

        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert!(matches!(app.dialog, Some(Dialog::Error(_))));
        assert_eq!(app.input_mode, InputMode::Form);

        // Dismiss, then finish the form
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "01-01-1965");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Books");

        let action = press(&mut app, KeyCode::Enter);
        assert_eq!(
            action,
            Some(Action::Submit(NewEntry::new(
                "Dune",
                "Herbert",
                "01-01-1965",
                "Books"
            )))
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut form = EntryForm::default();
        form.prev_field();
        assert_eq!(form.focus, 3);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_delete_without_selection_warns() {
        let mut app = App::new("");
        assert_eq!(press(&mut app, KeyCode::Char('d')), None);
        assert!(matches!(app.dialog, Some(Dialog::Warning(_))));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut app = App::new("");
        app.show_entries(vec![entry("1", "Dune")]);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert_eq!(press(&mut app, KeyCode::Char('n')), None);
        assert!(app.pending_delete.is_none());

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(
            press(&mut app, KeyCode::Char('y')),
            Some(Action::Delete("1".to_string()))
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_dialog_swallows_next_key() {
        let mut app = App::new("");
        app.dialog = Some(Dialog::Info("hello".to_string()));

        assert_eq!(press(&mut app, KeyCode::Char('q')), None);
        assert!(app.dialog.is_none());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_submit_search_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let client = spawn_test_server(&temp_dir).await;
        let mut app = App::new(client.base_url());

        app.category_index = 2;
        app.perform(
            Action::Submit(NewEntry::new("Dune", "Herbert", "01-01-1965", "Books")),
            &client,
        )
        .await;
        assert!(app.dialog.is_none());
        assert_eq!(app.current_category(), "All");
        assert_eq!(app.entries.len(), 1);

        app.search_input = "dune".to_string();
        app.perform(Action::Search, &client).await;
        assert_eq!(app.entries[0].name, "Dune");

        let id = app.entries[0].id.clone();
        app.perform(Action::ShowDetails(id.clone()), &client).await;
        assert!(matches!(app.dialog, Some(Dialog::Details(ref e)) if e.id == id));
        app.dialog = None;

        app.perform(Action::Delete(id), &client).await;
        assert!(app.dialog.is_none());
        assert!(app.entries.is_empty());
    }

    #[tokio::test]
    async fn test_search_miss_keeps_table() {
        let temp_dir = TempDir::new().unwrap();
        let client = spawn_test_server(&temp_dir).await;
        let mut app = App::new(client.base_url());

        client
            .create(&NewEntry::new("Dune", "Herbert", "01-01-1965", "Books"))
            .await
            .unwrap();
        app.perform(Action::LoadAll, &client).await;

        app.search_input = "Emma".to_string();
        app.perform(Action::Search, &client).await;
        assert_eq!(app.dialog, Some(Dialog::Info("No media found.".to_string())));
        assert_eq!(app.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let temp_dir = TempDir::new().unwrap();
        let client = spawn_test_server(&temp_dir).await;
        let mut app = App::new(client.base_url());

        client
            .create(&NewEntry::new("Dune", "Herbert", "01-01-1965", "Books"))
            .await
            .unwrap();
        client
            .create(&NewEntry::new("Alien", "Scott", "25-05-1979", "movies"))
            .await
            .unwrap();

        app.category_index = 2;
        app.perform(Action::LoadCategory, &client).await;
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].name, "Alien");
    }

    #[tokio::test]
    async fn test_cycling_back_to_all_lists_everything() {
        let temp_dir = TempDir::new().unwrap();
        let client = spawn_test_server(&temp_dir).await;
        let mut app = App::new(client.base_url());

        client
            .create(&NewEntry::new("Dune", "Herbert", "01-01-1965", "Books"))
            .await
            .unwrap();
        client
            .create(&NewEntry::new("Alien", "Scott", "25-05-1979", "Movies"))
            .await
            .unwrap();

        // Tab twice: All -> Books -> Movies
        for _ in 0..2 {
            let action = press(&mut app, KeyCode::Tab).unwrap();
            app.perform(action, &client).await;
        }
        assert_eq!(app.current_category(), "Movies");
        assert_eq!(app.entries.len(), 1);

        // Two more: Magazines, then wrap to All
        for _ in 0..2 {
            let action = press(&mut app, KeyCode::Tab).unwrap();
            app.perform(action, &client).await;
        }
        assert_eq!(app.category_index, 0);
        assert_eq!(app.current_category(), "All");

        let names: Vec<&str> = app.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Dune", "Alien"]);
    }

    #[tokio::test]
    async fn test_network_error_opens_error_dialog() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = ApiClient::new(&format!("http://127.0.0.1:{}", port)).unwrap();
        let mut app = App::new(client.base_url());
        app.show_entries(vec![entry("1", "Dune")]);

        app.perform(Action::LoadAll, &client).await;
        assert!(matches!(app.dialog, Some(Dialog::Error(_))));
        assert_eq!(app.entries.len(), 1);
    }
}
