//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the view model, handles
//! user input, renders the interface and applies store responses posted by
//! the calls it spawns.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::fields::{status_icon, status_tone, PriorityBand, Status, StatusIcon};
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::tui::{
    colors::{band_color, tone_color, BRAND, GOLD},
    dispatch::{spawn_create, spawn_load, spawn_save_note, EventSender},
    enums::{AppState, StoreEvent},
    input::InputField,
    task_form::{
        TaskForm, DESCRIPTION_GLOBAL_ORDER, STATUS_GLOBAL_ORDER, TITLE_GLOBAL_ORDER,
        TRIGGER_GLOBAL_ORDER,
    },
    utils::centered_rect,
};
use crate::view_model::TaskListViewModel;

const NOTES_PLACEHOLDER: &str = "Nenhuma anotação adicionada";
const MISSING: &str = "N/A";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    vm: TaskListViewModel,
    table_name: String,
    task_list_state: TableState,
    task_form: TaskForm,
    note_input: InputField,
    status_message: String,
    /// An insert is in flight; further submits are ignored until it lands.
    creating: bool,
    spinner: usize,
    tx: EventSender,
}

impl App {
    pub fn new(store: Arc<dyn TaskStore>, table: &str, tx: EventSender) -> Self {
        let vm = TaskListViewModel::new(store);
        let task_form = TaskForm::from_draft(&vm.create_modal().draft);
        App {
            state: AppState::TaskList,
            vm,
            table_name: table.to_string(),
            task_list_state: TableState::default(),
            task_form,
            note_input: InputField::new(),
            status_message: String::new(),
            creating: false,
            spinner: 0,
            tx,
        }
    }

    fn request_load(&mut self) {
        self.vm.begin_load();
        spawn_load(self.vm.store(), self.tx.clone());
    }

    fn selected_task(&self) -> Option<&Task> {
        self.task_list_state
            .selected()
            .and_then(|i| self.vm.tasks().get(i))
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id)
    }

    /// Keep the selection on the same task after the collection changed.
    fn reselect(&mut self, id: Option<TaskId>) {
        let tasks = self.vm.tasks();
        let index = id
            .and_then(|id| tasks.iter().position(|t| t.id == id))
            .or_else(|| {
                if tasks.is_empty() {
                    None
                } else {
                    let previous = self.task_list_state.selected().unwrap_or(0);
                    Some(previous.min(tasks.len() - 1))
                }
            });
        self.task_list_state.select(index);
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.vm.tasks().len();
        if len == 0 {
            return;
        }
        let next = match self.task_list_state.selected() {
            Some(i) if down => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.task_list_state.select(Some(next));
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Apply a store response to the view model.
    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Loaded(result) => {
                let selected = self.selected_id();
                if !self.vm.finish_load(result) {
                    self.set_status_message("Erro ao carregar tarefas".to_string());
                }
                self.reselect(selected);
            }
            StoreEvent::Created(result) => {
                self.creating = false;
                let selected = self.selected_id();
                if self.vm.finish_create(result) {
                    self.task_form = TaskForm::from_draft(&self.vm.create_modal().draft);
                    if self.state == AppState::CreateModal {
                        self.state = AppState::TaskList;
                    }
                    self.reselect(selected);
                    self.set_status_message("Demanda criada".to_string());
                    self.request_load();
                } else {
                    self.set_status_message("Erro ao criar demanda".to_string());
                }
            }
            StoreEvent::NoteSaved { id, text, result } => {
                if self.vm.finish_save_note(id, text, result) {
                    if self.state == AppState::NoteEdit && self.vm.note_edit().is_none() {
                        self.state = AppState::TaskList;
                    }
                    self.set_status_message("Anotação salva".to_string());
                } else {
                    self.set_status_message("Erro ao salvar anotação".to_string());
                }
            }
        }
    }

    fn open_create_modal(&mut self) {
        self.vm.open_create_modal();
        self.task_form = TaskForm::from_draft(&self.vm.create_modal().draft);
        self.state = AppState::CreateModal;
    }

    fn start_note_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.vm.start_note_edit(id) {
            let draft = self.vm.note_edit().map(|e| e.draft.as_str()).unwrap_or_default();
            self.note_input = InputField::with_value(draft);
            self.note_input.active = true;
            self.state = AppState::NoteEdit;
        }
    }

    fn save_note(&mut self) {
        let Some(id) = self.vm.note_edit().map(|e| e.task_id) else {
            return;
        };
        let text = self.note_input.value.clone();
        spawn_save_note(self.vm.store(), id, text, self.tx.clone());
        self.set_status_message("Salvando anotação...".to_string());
    }

    fn submit_create(&mut self) {
        if self.creating {
            return;
        }
        let draft = self.task_form.to_draft();
        self.vm.set_draft(draft.clone());
        if let Err(e) = draft.validate() {
            self.set_status_message(e.to_string());
            return;
        }
        let new = self.vm.prepare_create(&draft);
        self.creating = true;
        spawn_create(self.vm.store(), new, self.tx.clone());
        self.set_status_message("Criando demanda...".to_string());
    }

    /// Handle input in the task list. Returns true if the app should quit.
    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char('n') => self.open_create_modal(),
            KeyCode::Char('e') | KeyCode::Enter => self.start_note_edit(),
            KeyCode::Char('r') => {
                if !self.vm.is_loading() {
                    self.request_load();
                }
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_note_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.vm.cancel_note_edit();
                self.note_input = InputField::new();
                self.state = AppState::TaskList;
                return;
            }
            KeyCode::Enter => {
                self.save_note();
                return;
            }
            KeyCode::Char(c) => self.note_input.handle_char(c),
            KeyCode::Backspace => self.note_input.handle_backspace(),
            KeyCode::Delete => self.note_input.handle_delete(),
            KeyCode::Left => self.note_input.move_cursor_left(),
            KeyCode::Right => self.note_input.move_cursor_right(),
            KeyCode::Home => self.note_input.move_home(),
            KeyCode::End => self.note_input.move_end(),
            _ => return,
        }
        self.vm.set_note_draft(self.note_input.value.clone());
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.vm.set_draft(self.task_form.to_draft());
                self.vm.close_create_modal();
                self.state = AppState::TaskList;
                return;
            }
            KeyCode::Enter => {
                self.submit_create();
                return;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            _ => return,
        }
        self.vm.set_draft(self.task_form.to_draft());
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(
            key,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::F(1)
        ) {
            self.state = AppState::TaskList;
        }
    }

    /// Dispatch a key press based on the current state.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.clear_status_message();

        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key.code),
            AppState::NoteEdit => self.handle_note_input(key.code),
            AppState::CreateModal => self.handle_form_input(key.code),
            AppState::Help => self.handle_help_input(key.code),
        }
        false
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "Gestão de Tarefas",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Tabela: {}", self.table_name),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_spinner(&self, f: &mut Frame, area: Rect) {
        let frame = SPINNER[self.spinner % SPINNER.len()];
        let spinner = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{frame} Carregando tarefas..."),
                Style::default().fg(BRAND),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(spinner, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let title = format!("Tarefas ({}) - 'h' para ajuda", self.vm.tasks().len());
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.vm.tasks().is_empty() {
            let empty = Paragraph::new("Nenhuma tarefa encontrada. Pressione 'n' para criar.")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header_cells = ["", "Pri", "Tarefa", "Gatilho", "Status", "Anotações"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(BRAND).fg(Color::Black))
            .height(1);

        let rows: Vec<Row> = self.vm.tasks().iter().map(task_row).collect();
        let widths = [
            Constraint::Length(2),  // Icon
            Constraint::Length(5),  // Priority
            Constraint::Min(20),    // Title
            Constraint::Length(14), // Trigger
            Constraint::Length(13), // Status
            Constraint::Min(20),    // Notes
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_task_detail(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Detalhes");
        let Some(task) = self.selected_task() else {
            f.render_widget(Paragraph::new("Selecione uma tarefa").block(block), area);
            return;
        };

        let editing = self.state == AppState::NoteEdit && self.vm.editing(task.id);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(if editing { 3 } else { 0 }),
            ])
            .split(area);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let tone = tone_color(status_tone(task.status.as_ref()));
        let notes = match present(task.notes.as_deref()) {
            Some(n) => Line::from(n),
            None => Line::from(Span::styled(
                NOTES_PLACEHOLDER,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
        };

        let lines = vec![
            Line::from(Span::styled(task.task.as_deref().unwrap_or("-"), bold)),
            Line::from(vec![
                Span::styled(format!("#{} ", task.priority), Style::default().fg(band_color(task.priority.band()))),
                Span::styled(status_label(task.status.as_ref()), Style::default().fg(tone)),
            ]),
            Line::from(""),
            Line::from(Span::styled("Descrição:", bold)),
            Line::from(task.description.as_deref().unwrap_or("-")),
            Line::from(""),
            Line::from(vec![
                Span::styled("Gatilho: ", bold),
                Span::raw(present(task.trigger.as_deref()).unwrap_or(MISSING)),
            ]),
            Line::from(vec![
                Span::styled("Prazo de entrega: ", bold),
                Span::raw(task.delivery_time.as_deref().unwrap_or("-")),
            ]),
            Line::from(vec![
                Span::styled("Criada em: ", bold),
                Span::raw(
                    task.created_at
                        .with_timezone(&Local)
                        .format("%d/%m/%Y %H:%M")
                        .to_string(),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled("Anotações:", bold)),
            notes,
        ];

        let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        f.render_widget(detail, chunks[0]);

        if editing {
            self.render_note_editor(f, chunks[1]);
        }
    }

    fn render_note_editor(&self, f: &mut Frame, area: Rect) {
        let (before, _) = self.note_input.split_at_cursor();
        let cursor_x = Line::from(before).width() as u16;
        let inner_width = area.width.saturating_sub(2);
        let scroll = cursor_x.saturating_sub(inner_width.saturating_sub(1));

        let editor = Paragraph::new(self.note_input.value.as_str())
            .scroll((0, scroll))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Anotação (Enter salva, Esc cancela)")
                    .border_style(Style::default().fg(GOLD)),
            );
        f.render_widget(editor, area);
        f.set_cursor_position((area.x + 1 + cursor_x - scroll, area.y + 1));
    }

    fn render_create_modal(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title("Criar Nova Demanda")
            .border_style(Style::default().fg(BRAND));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Status
                Constraint::Length(3), // Trigger
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let form = &self.task_form;
        let focus = |order: usize| {
            if form.current_field == order {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        let inputs = [
            (TITLE_GLOBAL_ORDER, "Título da Tarefa *", &form.title, chunks[0]),
            (DESCRIPTION_GLOBAL_ORDER, "Descrição *", &form.description, chunks[1]),
            (TRIGGER_GLOBAL_ORDER, "Gatilho *", &form.trigger, chunks[3]),
        ];
        for (order, title, field, chunk) in inputs {
            let input = Paragraph::new(field.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(focus(order)),
            );
            f.render_widget(input, chunk);
        }

        let status = form.selected_status();
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(
                status.label(),
                Style::default().fg(tone_color(status_tone(Some(status)))),
            ),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .border_style(focus(STATUS_GLOBAL_ORDER)),
        );
        f.render_widget(selector, chunks[2]);

        let instructions = Paragraph::new(
            "Tab/↑↓ muda de campo  ←→ muda o status  Enter cria  Esc fecha",
        )
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[4]);

        let cursor_field = match form.current_field {
            TITLE_GLOBAL_ORDER => Some((chunks[0], &form.title)),
            DESCRIPTION_GLOBAL_ORDER => Some((chunks[1], &form.description)),
            TRIGGER_GLOBAL_ORDER => Some((chunks[3], &form.trigger)),
            _ => None,
        };
        if let Some((chunk, field)) = cursor_field {
            let (before, _) = field.split_at_cursor();
            let x = (Line::from(before).width() as u16).min(chunk.width.saturating_sub(3));
            f.set_cursor_position((chunk.x + x + 1, chunk.y + 1));
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Ajuda", bold)),
            Line::from(""),
            Line::from(Span::styled("Lista de tarefas:", bold)),
            Line::from("  ↑/k, ↓/j     Navegar entre tarefas"),
            Line::from("  e/Enter      Editar anotação da tarefa selecionada"),
            Line::from("  n            Criar nova demanda"),
            Line::from("  r            Recarregar tarefas"),
            Line::from("  h/F1         Mostrar esta ajuda"),
            Line::from("  q/Esc/Ctrl+C Sair"),
            Line::from(""),
            Line::from(Span::styled("Editor de anotação:", bold)),
            Line::from("  Enter        Salvar"),
            Line::from("  Esc          Cancelar"),
            Line::from(""),
            Line::from(Span::styled("Nova demanda:", bold)),
            Line::from("  Tab/↑↓       Mudar de campo"),
            Line::from("  ←→           Mudar o status"),
            Line::from("  Enter        Criar"),
            Line::from("  Esc          Fechar mantendo o rascunho"),
            Line::from(""),
            Line::from(Span::styled("Prioridade:", bold)),
            Line::from(vec![
                Span::styled("  #7+ ", Style::default().fg(band_color(PriorityBand::High))),
                Span::raw("alta  "),
                Span::styled("#4-6 ", Style::default().fg(band_color(PriorityBand::Medium))),
                Span::raw("média  "),
                Span::styled("#0-3 ", Style::default().fg(band_color(PriorityBand::Low))),
                Span::raw("baixa"),
            ]),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Ajuda - Esc para voltar"),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tarefas: {} | Pressione 'h' para ajuda", self.vm.tasks().len())
                }
                AppState::NoteEdit => "Editando anotação".to_string(),
                AppState::CreateModal => "Nova demanda".to_string(),
                AppState::Help => "Ajuda".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(BRAND).fg(Color::Black))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        if self.state == AppState::Help {
            self.render_help(f, chunks[1]);
        } else if self.vm.is_loading() {
            self.render_spinner(f, chunks[1]);
        } else {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(chunks[1]);
            self.render_task_list(f, body[0]);
            self.render_task_detail(f, body[1]);
        }

        if self.state == AppState::CreateModal {
            self.render_create_modal(f, chunks[1]);
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Multiplexes key presses, store responses and a redraw tick until the
    /// user exits.
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        rx: &mut UnboundedReceiver<StoreEvent>,
    ) -> io::Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(100));
        self.request_load();

        loop {
            terminal.draw(|f| self.render(f))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                },
                Some(event) = rx.recv() => self.apply(event),
                _ = tick.tick() => self.spinner = self.spinner.wrapping_add(1),
            }
        }
        Ok(())
    }
}

/// `Some` only for non-empty text; empty values render like missing ones.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn status_label(status: Option<&Status>) -> &str {
    match status {
        Some(s) if !s.label().is_empty() => s.label(),
        _ => MISSING,
    }
}

fn icon_glyph(icon: StatusIcon) -> &'static str {
    match icon {
        StatusIcon::Done => "✔",
        StatusIcon::InProgress => "◐",
        StatusIcon::Pending => "●",
        StatusIcon::Unknown => "○",
    }
}

fn task_row(task: &Task) -> Row<'_> {
    let tone = Style::default().fg(tone_color(status_tone(task.status.as_ref())));
    let notes = match present(task.notes.as_deref()) {
        Some(n) => Cell::from(n.replace('\n', " ")),
        None => Cell::from(Span::styled(
            NOTES_PLACEHOLDER,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    };

    Row::new(vec![
        Cell::from(Span::styled(icon_glyph(status_icon(task.status.as_ref())), tone)),
        Cell::from(Span::styled(
            format!("#{}", task.priority),
            Style::default()
                .fg(band_color(task.priority.band()))
                .add_modifier(Modifier::BOLD),
        )),
        Cell::from(task.task.as_deref().unwrap_or("")),
        Cell::from(present(task.trigger.as_deref()).unwrap_or(MISSING)),
        Cell::from(Span::styled(status_label(task.status.as_ref()), tone)),
        notes,
    ])
}
