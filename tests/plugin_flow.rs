use tabula::app::{handle_event, Action, Event, StatusLine};
use tabula::domain::Record;
use tabula::ui::TableBody;
use tabula::worker::{DatasetWorker, WorkerMessage, WorkerResponse};
use tabula::{initialize, Config};
use tempfile::TempDir;

const DATASET: &str = r#"{
  "columns": [
    { "key": "name", "title": "Name" },
    { "key": "salary", "title": "Salary", "format": "currency" }
  ],
  "rows": [
    { "id": "u1", "name": "Bob", "salary": 70000 },
    { "id": "u2", "name": "Alice", "salary": 62000 },
    { "id": "u3", "name": "Carol", "salary": null }
  ],
  "row_key": "id"
}"#;

fn post(worker: &mut DatasetWorker, actions: Vec<Action>) -> Vec<WorkerResponse> {
    actions
        .into_iter()
        .filter_map(|action| match action {
            Action::PostToWorker(message) => Some(worker.handle_message(message)),
            Action::CloseFocus => None,
        })
        .collect()
}

#[test]
fn load_select_sort_and_export() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("users.json");
    let export_file = dir.path().join("out").join("selected.json");
    std::fs::write(&data_file, DATASET).unwrap();

    let config = Config {
        data_file: Some(data_file.to_string_lossy().into_owned()),
        export_file: Some(export_file.to_string_lossy().into_owned()),
        ..Config::default()
    };
    let mut state = initialize(&config);
    let mut worker = DatasetWorker::new();

    let loaded = worker.handle_message(WorkerMessage::load_dataset(config.data_file.clone()));
    handle_event(&mut state, &Event::WorkerResponse(loaded)).unwrap();
    assert_eq!(state.table.len(), 3);

    // select Bob, then sort by name; Bob stays selected
    let (_, actions) = handle_event(&mut state, &Event::ToggleRow).unwrap();
    assert_eq!(actions.len(), 1);
    let (_, actions) = handle_event(&mut state, &Event::SortColumn(0)).unwrap();
    assert!(actions.is_empty());
    assert!(state.table.is_selected(1));

    // select Alice at the top of the sorted view
    assert_eq!(state.cursor, 0);
    let (_, actions) = handle_event(&mut state, &Event::ToggleRow).unwrap();

    for response in post(&mut worker, actions) {
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
    }

    let written: Vec<Record> = serde_json::from_str(&std::fs::read_to_string(&export_file).unwrap()).unwrap();
    let names: Vec<_> = written.iter().map(|r| r.get("name").to_string()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
    assert!(matches!(&state.status, Some(StatusLine::Info(text)) if text.starts_with("Exported 2 rows")));
}

#[test]
fn reload_keeps_selection_by_row_key() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("users.json");
    std::fs::write(&data_file, DATASET).unwrap();

    let config = Config {
        data_file: Some(data_file.to_string_lossy().into_owned()),
        ..Config::default()
    };
    let mut state = initialize(&config);
    let mut worker = DatasetWorker::new();

    let loaded = worker.handle_message(WorkerMessage::load_dataset(config.data_file.clone()));
    handle_event(&mut state, &Event::WorkerResponse(loaded)).unwrap();
    handle_event(&mut state, &Event::ToggleRow).unwrap();

    let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
    assert!(state.table.options().loading);
    for response in post(&mut worker, actions) {
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
    }

    assert!(!state.table.options().loading);
    assert_eq!(state.table.selected_records()[0].get("name").to_string(), "Bob");
}

#[test]
fn missing_dataset_reports_error_and_shows_empty_table() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_file: Some(dir.path().join("nope.json").to_string_lossy().into_owned()),
        ..Config::default()
    };
    let mut state = initialize(&config);
    let mut worker = DatasetWorker::new();

    let response = worker.handle_message(WorkerMessage::load_dataset(config.data_file.clone()));
    assert!(matches!(response, WorkerResponse::Error { .. }));
    handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();

    assert!(matches!(state.status, Some(StatusLine::Error(_))));
    let vm = state.compute_viewmodel(24, 80);
    assert!(matches!(vm.body, TableBody::Empty(_)));
}

#[test]
fn currency_cells_render_and_filter() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("users.json");
    std::fs::write(&data_file, DATASET).unwrap();

    let config = Config {
        data_file: Some(data_file.to_string_lossy().into_owned()),
        ..Config::default()
    };
    let mut state = initialize(&config);
    let loaded = DatasetWorker::new().handle_message(WorkerMessage::load_dataset(config.data_file.clone()));
    handle_event(&mut state, &Event::WorkerResponse(loaded)).unwrap();

    handle_event(&mut state, &Event::SearchMode).unwrap();
    for c in "$62".chars() {
        handle_event(&mut state, &Event::Char(c)).unwrap();
    }

    let TableBody::Rows(rows) = state.compute_viewmodel(24, 80).body else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells[1].text, "$62,000");
    assert_eq!(rows[0].cells[1].highlight_ranges, vec![(0, 3)]);
}
