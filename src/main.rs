use iced::keyboard;
use iced::widget::image::Handle as ImageHandle;
use iced::widget::{button, column, container, row, text, text_input, vertical_rule, Column};
use iced::window;
use iced::{Alignment, Color, Element, Length, Point, Subscription, Task, Theme};
use std::path::PathBuf;

// Declare the application modules
mod cache;
mod error;
mod exif_time;
mod state;

use state::catalog::{key_to_path, Catalog};
use state::data::{Derived, ImageRecord, REMARK_COUNT, SCHEMA};
use state::store::{RecordStore, RECORD_FILE};

/// Main application state
///
/// One photo is in view at a time. Everything the view needs is kept
/// here: the derived columns of the current photo, the live contents
/// of the remark inputs, and the cached thumbnail to display.
struct RemarkEditor {
    /// Directory tree the photos live under
    root: PathBuf,
    /// The record mapping loaded from info.csv
    store: RecordStore,
    /// All discovered photos plus the viewing position
    catalog: Catalog,
    /// Derived columns of the photo in view
    derived: Derived,
    /// Editable remark inputs, in schema order
    remarks: [String; REMARK_COUNT],
    /// Cache path of the thumbnail in view
    thumbnail: PathBuf,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User typed into remark input `i`
    RemarkEdited(usize, String),
    /// "next" button or Alt+N: commit, then advance
    Next,
    /// "prev" button or Alt+P: commit, then retreat
    Previous,
    /// Window close request: commit, save the store, then close
    CloseRequested(window::Id),
}

impl RemarkEditor {
    /// Build the initial state from the already-loaded store and
    /// catalog, resuming at the photo the previous session stopped on.
    fn start(root: PathBuf, store: RecordStore, mut catalog: Catalog) -> (Self, Task<Message>) {
        if let Some(last) = store.last_path() {
            catalog.resume_at(last);
        }

        let mut editor = RemarkEditor {
            root,
            store,
            catalog,
            derived: Derived::new(String::new(), String::new()),
            remarks: Default::default(),
            thumbnail: PathBuf::new(),
        };
        editor.enter_current();

        (editor, Task::none())
    }

    /// Bring the photo under the cursor into view: derive its columns,
    /// make sure its thumbnail exists, and populate the remark inputs
    /// from its record (or a fresh default).
    fn enter_current(&mut self) {
        let relative = self.catalog.current().to_string();

        // If this fails the program stops: every record carries the
        // capture date and there is nothing sensible to fall back to.
        let datetime = exif_time::capture_datetime(&self.root.join(key_to_path(&relative)))
            .expect("Failed to read the EXIF capture time of the current photo");
        self.derived = Derived::new(relative.clone(), datetime);

        self.thumbnail = cache::thumbnail::ensure_thumbnail(&self.root, &relative)
            .expect("Failed to generate thumbnail. Check that the cache directory is writable.");

        let record = self.store.get_or_synthesize(&self.derived);
        self.remarks = [
            record.rem1.clone(),
            record.rem2.clone(),
            record.rem3.clone(),
        ];
    }

    /// Write the record for the photo in view into the store, exactly
    /// as it will be saved, and log the resulting values.
    fn commit_current(&mut self) {
        let record = ImageRecord::committed(&self.derived, &self.remarks);
        println!("📝 {}: {}", record.path, record.log_line());
        self.store.put(record);
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RemarkEdited(ix, value) => {
                self.remarks[ix] = value;
                Task::none()
            }
            Message::Next => {
                self.commit_current();
                self.catalog.advance();
                self.enter_current();
                Task::none()
            }
            Message::Previous => {
                self.commit_current();
                self.catalog.retreat();
                self.enter_current();
                Task::none()
            }
            Message::CloseRequested(id) => {
                self.commit_current();

                // The record of the photo viewed last moves to the end
                // of the mapping; the next run resumes from it.
                self.store.move_to_end(self.catalog.current());
                self.store
                    .save(&self.root.join(RECORD_FILE))
                    .expect("Failed to save the record file");
                println!("💾 Saved {} records to {}", self.store.len(), RECORD_FILE);

                window::close(id)
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let highlighted = self.remarks.iter().any(|r| !r.is_empty());

        // Left pane: the cached thumbnail, framed red when the photo
        // already carries remarks so it stands out while stepping.
        let photo = container(iced::widget::image(ImageHandle::from_path(
            self.thumbnail.clone(),
        )))
        .padding(6)
        .style(move |_theme: &Theme| {
            let mut style = container::Style::default();
            if highlighted {
                style.background = Some(Color::from_rgb(0.72, 0.11, 0.11).into());
            }
            style
        });

        // Right pane: one labeled input per shown column.
        let mut fields = Column::new().spacing(8);
        for (ix, field) in SCHEMA.iter().filter(|f| f.shown).enumerate() {
            fields = fields.push(
                row![
                    text(field.name).size(14).width(Length::Fixed(72.0)),
                    text_input("", &self.remarks[ix])
                        .on_input(move |value| Message::RemarkEdited(ix, value))
                        .size(14)
                        .width(Length::Fixed(220.0)),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            );
        }

        let buttons = row![
            button("prev").on_press(Message::Previous).padding(10),
            button("next").on_press(Message::Next).padding(10),
        ]
        .spacing(10);

        let content = row![
            photo,
            vertical_rule(2),
            column![fields, buttons].spacing(24),
        ]
        .spacing(16)
        .padding(16)
        .align_y(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Keyboard accelerators mirror the buttons; close requests come
    /// through here because exit_on_close_request is off, so the
    /// current edit is always committed before the window goes away.
    fn subscription(&self) -> Subscription<Message> {
        let accelerators = keyboard::on_key_press(|key, modifiers| {
            if !modifiers.alt() {
                return None;
            }
            match key.as_ref() {
                keyboard::Key::Character("n") => Some(Message::Next),
                keyboard::Key::Character("p") => Some(Message::Previous),
                _ => None,
            }
        });

        let close = window::close_requests().map(Message::CloseRequested);

        Subscription::batch([accelerators, close])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    // Photos are expected in camera subfolders of the working
    // directory, exactly as they come off the memory cards.
    let root = std::env::current_dir().expect("Failed to determine the working directory");

    let store = RecordStore::load(&root.join(RECORD_FILE))
        .expect("Failed to load the record file. Fix or remove info.csv and retry.");
    let catalog = Catalog::discover(&root);

    if catalog.is_empty() {
        eprintln!("❌ No photos found under {}", root.display());
        return Ok(());
    }

    println!(
        "🖼️  {} photos in catalog, {} records loaded",
        catalog.len(),
        store.len()
    );

    iced::application("Edit info", RemarkEditor::update, RemarkEditor::view)
        .theme(RemarkEditor::theme)
        .subscription(RemarkEditor::subscription)
        .window(window::Settings {
            position: window::Position::Specific(Point::new(200.0, 200.0)),
            level: window::Level::AlwaysOnTop,
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .run_with(move || RemarkEditor::start(root, store, catalog))
}
