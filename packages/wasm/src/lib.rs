use blockform_editor::{DragSource, DropTarget, EditSession, EditorEvent, EditorOptions, FormDocument};
use blockform_linter::{lint_form, LintOptions};
use blockform_logic::{Answers, BaseVisibility, EvaluationOptions, LogicEngine};
use blockform_model::{BlockPatch, BlockType, Form, LogicRule};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn from_json<T: DeserializeOwned>(source: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(source).map_err(|e| format!("Invalid {}: {}", what, e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Editing session handle for the JS editor UI. All structured values cross
/// the boundary as JSON strings.
#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl Editor {
    fn open(form_json: &str, history_depth: Option<u32>) -> Result<Editor, String> {
        let document = FormDocument::from_json(form_json).map_err(|e| e.to_string())?;
        let options = EditorOptions {
            history_depth: history_depth
                .map(|depth| depth as usize)
                .unwrap_or(EditorOptions::default().history_depth),
        };

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut session = EditSession::from_document(document, options);
        let sink = events.clone();
        session.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Ok(Editor { session, events })
    }

    fn block_type(name: &str) -> Result<BlockType, String> {
        match BlockType::from(name.to_string()) {
            BlockType::Unknown(name) => Err(format!("Invalid block type: {}", name)),
            known => Ok(known),
        }
    }

    fn drag_over_json(&mut self, over_json: Option<String>) -> Result<Option<String>, String> {
        let over: Option<DropTarget> = match over_json {
            Some(json) => from_json(&json, "drop target")?,
            None => None,
        };
        self.session
            .drag_over(over)
            .map(|command| to_json(&command))
            .transpose()
    }
}

#[wasm_bindgen]
impl Editor {
    /// Open a form snapshot
    #[wasm_bindgen(constructor)]
    pub fn new(form_json: &str, history_depth: Option<u32>) -> Result<Editor, JsValue> {
        Editor::open(form_json, history_depth).map_err(js_error)
    }

    /// Current form as JSON
    #[wasm_bindgen(js_name = formJson)]
    pub fn form_json(&self) -> Result<String, JsValue> {
        to_json(self.session.form()).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> f64 {
        self.session.version() as f64
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.session.mark_saved();
    }

    // Blocks

    #[wasm_bindgen(js_name = addBlock)]
    pub fn add_block(
        &mut self,
        block_type: &str,
        page_id: &str,
        index: Option<u32>,
    ) -> Result<Option<String>, JsValue> {
        let block_type = Editor::block_type(block_type).map_err(js_error)?;
        Ok(self
            .session
            .add_block_of_type(block_type, page_id, index.map(|i| i as usize)))
    }

    #[wasm_bindgen(js_name = updateBlock)]
    pub fn update_block(&mut self, block_id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let patch: BlockPatch = from_json(patch_json, "block patch").map_err(js_error)?;
        Ok(self.session.update_block(block_id, patch))
    }

    #[wasm_bindgen(js_name = deleteBlock)]
    pub fn delete_block(&mut self, block_id: &str) -> bool {
        self.session.delete_block(block_id)
    }

    #[wasm_bindgen(js_name = duplicateBlock)]
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        self.session.duplicate_block(block_id)
    }

    #[wasm_bindgen(js_name = moveBlock)]
    pub fn move_block(&mut self, block_id: &str, page_id: &str, index: u32) -> bool {
        self.session.move_block(block_id, page_id, index as usize)
    }

    // Pages and form

    #[wasm_bindgen(js_name = addPage)]
    pub fn add_page(&mut self, title: &str) -> String {
        self.session.add_page(title)
    }

    #[wasm_bindgen(js_name = renamePage)]
    pub fn rename_page(&mut self, page_id: &str, title: &str) -> bool {
        self.session.rename_page(page_id, title)
    }

    #[wasm_bindgen(js_name = deletePage)]
    pub fn delete_page(&mut self, page_id: &str) -> bool {
        self.session.delete_page(page_id)
    }

    #[wasm_bindgen(js_name = updateForm)]
    pub fn update_form(&mut self, title: Option<String>, description: Option<String>) -> bool {
        self.session.update_form(title, description)
    }

    // Logic rules

    #[wasm_bindgen(js_name = addRule)]
    pub fn add_rule(&mut self, rule_json: &str) -> Result<Option<String>, JsValue> {
        let rule: LogicRule = from_json(rule_json, "rule").map_err(js_error)?;
        Ok(self.session.add_rule(rule))
    }

    #[wasm_bindgen(js_name = updateRule)]
    pub fn update_rule(&mut self, rule_json: &str) -> Result<bool, JsValue> {
        let rule: LogicRule = from_json(rule_json, "rule").map_err(js_error)?;
        Ok(self.session.update_rule(rule))
    }

    #[wasm_bindgen(js_name = deleteRule)]
    pub fn delete_rule(&mut self, rule_id: &str) -> bool {
        self.session.delete_rule(rule_id)
    }

    // Selection

    #[wasm_bindgen(js_name = selectBlock)]
    pub fn select_block(&mut self, block_id: &str) -> bool {
        self.session.select_block(block_id)
    }

    #[wasm_bindgen(js_name = selectPage)]
    pub fn select_page(&mut self, page_id: &str) -> bool {
        self.session.select_page(page_id)
    }

    #[wasm_bindgen(getter, js_name = selectedBlockId)]
    pub fn selected_block_id(&self) -> Option<String> {
        self.session.selected_block_id().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = selectedPageId)]
    pub fn selected_page_id(&self) -> Option<String> {
        self.session.selected_page_id().map(str::to_string)
    }

    #[wasm_bindgen(js_name = requestAttention)]
    pub fn request_attention(&mut self, block_id: &str) -> bool {
        self.session.request_attention(block_id)
    }

    // History

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    #[wasm_bindgen(js_name = beginBatch)]
    pub fn begin_batch(&mut self, description: &str) {
        self.session.begin_batch(description);
    }

    #[wasm_bindgen(js_name = endBatch)]
    pub fn end_batch(&mut self) -> bool {
        self.session.end_batch()
    }

    // Drag and drop

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, active_json: &str) -> Result<(), JsValue> {
        let active: DragSource = from_json(active_json, "drag source").map_err(js_error)?;
        self.session.begin_drag(active);
        Ok(())
    }

    /// Returns the command a drop here would run, as JSON, for hover feedback
    #[wasm_bindgen(js_name = dragOver)]
    pub fn drag_over(&mut self, over_json: Option<String>) -> Result<Option<String>, JsValue> {
        self.drag_over_json(over_json).map_err(js_error)
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> bool {
        self.session.end_drag()
    }

    #[wasm_bindgen(js_name = dragCancel)]
    pub fn drag_cancel(&mut self) {
        self.session.cancel_drag();
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> Result<String, JsValue> {
        let events = std::mem::take(&mut *self.events.borrow_mut());
        to_json(&events).map_err(js_error)
    }
}

fn evaluate_logic(form_json: &str, answers_json: &str, hidden_until_shown: bool) -> Result<String, String> {
    let form: Form = from_json(form_json, "form")?;
    let answers: Answers = from_json(answers_json, "answers")?;
    let options = EvaluationOptions {
        base_visibility: if hidden_until_shown {
            BaseVisibility::HiddenUntilShown
        } else {
            BaseVisibility::Visible
        },
    };

    let navigator = LogicEngine::with_options(&form, options).navigate(&answers);
    to_json(&serde_json::json!({
        "decisions": navigator.decisions(),
        "path": navigator.path(),
    }))
}

/// Evaluate a form's logic against answers; returns decisions and the fill path
#[wasm_bindgen(js_name = evaluateLogic)]
pub fn evaluate_logic_js(form_json: &str, answers_json: &str, hidden_until_shown: bool) -> Result<String, JsValue> {
    evaluate_logic(form_json, answers_json, hidden_until_shown).map_err(js_error)
}

/// Lint a form and return diagnostics as JSON
#[wasm_bindgen(js_name = lintForm)]
pub fn lint_form_js(form_json: &str) -> Result<String, JsValue> {
    let form: Form = from_json(form_json, "form").map_err(js_error)?;
    to_json(&lint_form(&form, LintOptions::default())).map_err(js_error)
}
