//! Questionnaire UI components for the WebAssembly target.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::styles;
    use gloo::events::{EventListener, EventListenerOptions};
    use gloo::timers::callback::Timeout;
    use js_sys::Date;
    use questionnaire_core::submission::{
        is_answer_key, CONFIRM_PROMPT, HONEYPOT_FIELD, SUBMIT_ACTION,
    };
    use questionnaire_core::{
        AccessGate, Autocomplete, Completion, CompletionTracker, Countdown, FieldStyle,
        GuidancePanel, InputValidator, Key, KeyOutcome, NavOutcome, Navigator, QuestionnaireError,
        SubmissionForm, Tick, Vocabulary, UID_LENGTH,
    };
    use questionnaire_study::{GuidanceBlock, GuidanceRow, StudyPage};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, BeforeUnloadEvent, Document, Element, HtmlInputElement, Window};
    use yew::events::{InputEvent, KeyboardEvent, SubmitEvent};
    use yew::prelude::*;
    use yew::TargetCast;

    const ANSWER_FIELD_CLASS: &str = "answer-field";

    #[derive(Clone)]
    struct QuestionnaireState {
        vocabulary: Rc<Vocabulary>,
        navigator: Navigator,
        answers: Vec<String>,
        autocomplete: Autocomplete,
        field_style: FieldStyle,
        clock: Option<String>,
        elapsed_secs: Option<i64>,
    }

    impl QuestionnaireState {
        fn new(page: &StudyPage, navigator: Navigator) -> Self {
            let vocabulary = Rc::new(page.vocabulary.clone());
            let autocomplete = Autocomplete::new(&vocabulary, page.config.match_key);
            Self {
                navigator,
                answers: vec![String::new(); page.question_count()],
                autocomplete,
                field_style: FieldStyle::Normal,
                clock: Countdown::from_config(&page.config)
                    .map(|countdown| countdown.display().clock()),
                elapsed_secs: None,
                vocabulary,
            }
        }

        fn active_answer(&self) -> &str {
            self.answers
                .get(self.navigator.active_slot())
                .map(String::as_str)
                .unwrap_or_default()
        }

        fn completion(&self) -> Completion {
            CompletionTracker::new(InputValidator::new(&self.vocabulary))
                .evaluate(self.answers.as_slice())
        }

        fn apply_selection(&mut self, outcome: KeyOutcome) {
            if let KeyOutcome::Selected(label) = outcome {
                let slot = self.navigator.active_slot();
                if let Some(answer) = self.answers.get_mut(slot) {
                    *answer = label;
                }
                self.field_style = FieldStyle::Normal;
            }
        }
    }

    enum Action {
        Next,
        Back,
        Input(String),
        Focus,
        Key(Key),
        Select(usize),
        Dismiss,
        Validate,
        Tick(Tick),
    }

    impl Reducible for QuestionnaireState {
        type Action = Action;

        fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
            let vocabulary = Rc::clone(&self.vocabulary);
            let validator = InputValidator::new(&vocabulary);
            let mut next = (*self).clone();

            match action {
                Action::Next | Action::Back => {
                    let answer = next.active_answer().to_string();
                    let outcome = match action {
                        Action::Next => next.navigator.next(&answer, &validator),
                        _ => next.navigator.back(&answer, &validator),
                    };
                    match outcome {
                        NavOutcome::Moved { .. } => {
                            next.autocomplete.detach(&vocabulary);
                            next.field_style =
                                validator.check_allow_empty(next.active_answer()).style;
                        }
                        NavOutcome::Rejected => next.field_style = FieldStyle::Alert,
                        NavOutcome::Stayed => {}
                    }
                }
                Action::Input(text) => {
                    let slot = next.navigator.active_slot();
                    if let Some(answer) = next.answers.get_mut(slot) {
                        answer.clone_from(&text);
                    }
                    next.autocomplete.input(&text, &vocabulary);
                }
                Action::Focus => next.autocomplete.open(),
                Action::Key(key) => {
                    let outcome = next.autocomplete.key(key, &vocabulary);
                    next.apply_selection(outcome);
                }
                Action::Select(position) => {
                    let outcome = next.autocomplete.select(position, &vocabulary);
                    next.apply_selection(outcome);
                }
                Action::Dismiss => next.autocomplete.dismiss(),
                Action::Validate => {
                    next.field_style = validator.check(next.active_answer()).style;
                }
                Action::Tick(tick) => {
                    next.clock = Some(tick.display.clock());
                    next.elapsed_secs = Some(tick.elapsed_secs);
                }
            }

            Rc::new(next)
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct QuestionnaireProps {
        pub page: StudyPage,
        pub navigator: Navigator,
    }

    #[function_component(QuestionnaireView)]
    fn questionnaire_view(props: &QuestionnaireProps) -> Html {
        let page = &props.page;

        use_effect_with((), |_| {
            if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                if let Err(err) = styles::ensure_styles(&document) {
                    console::error_1(&err);
                }
            }
            || ()
        });

        let state = {
            let page = page.clone();
            let navigator = props.navigator.clone();
            use_reducer(move || QuestionnaireState::new(&page, navigator))
        };

        {
            let state = state.clone();
            let config = page.config.clone();
            use_effect_with((), move |_| {
                let stopped = Rc::new(Cell::new(false));
                if let Some(mut countdown) = Countdown::from_config(&config) {
                    let delay_ms = countdown.start(Date::now());
                    let on_tick =
                        Callback::from(move |tick: Tick| state.dispatch(Action::Tick(tick)));
                    schedule_tick(countdown, delay_ms, on_tick, Rc::clone(&stopped));
                }
                move || stopped.set(true)
            });
        }

        {
            let state = state.clone();
            use_effect_with((), move |_| {
                let listener = web_sys::window()
                    .and_then(|window| window.document())
                    .map(|document| {
                        EventListener::new(&document, "click", move |event| {
                            let inside_field = event
                                .target()
                                .and_then(|target| target.dyn_into::<Element>().ok())
                                .and_then(|element| {
                                    element
                                        .closest(&format!(".{ANSWER_FIELD_CLASS}"))
                                        .ok()
                                        .flatten()
                                })
                                .is_some();
                            if !inside_field {
                                state.dispatch(Action::Dismiss);
                            }
                        })
                    });
                move || drop(listener)
            });
        }

        let completion = state.completion();

        use_effect_with(completion.unload_guard_armed(), |armed| {
            let listener = match (*armed, web_sys::window()) {
                (true, Some(window)) => Some(EventListener::new_with_options(
                    &window,
                    "beforeunload",
                    EventListenerOptions::enable_prevent_default(),
                    |event| {
                        event.prevent_default();
                        if let Some(event) = event.dyn_ref::<BeforeUnloadEvent>() {
                            event.set_return_value("");
                        }
                    },
                )),
                _ => None,
            };
            move || drop(listener)
        });

        let view = state.navigator.view();
        let form = SubmissionForm::new(&page.config, state.answers.clone(), state.elapsed_secs);

        let on_next = {
            let state = state.clone();
            Callback::from(move |_: MouseEvent| state.dispatch(Action::Next))
        };
        let on_back = {
            let state = state.clone();
            Callback::from(move |_: MouseEvent| state.dispatch(Action::Back))
        };
        let on_submit = {
            let completion = completion.clone();
            Callback::from(move |event: SubmitEvent| {
                let confirmed = completion.confirm_submit(|| {
                    web_sys::window()
                        .and_then(|window| window.confirm_with_message(CONFIRM_PROMPT).ok())
                        .unwrap_or(false)
                });
                if !confirmed {
                    event.prevent_default();
                }
            })
        };

        html! {
            <form class="questionnaire-root" method="post" action={SUBMIT_ACTION} onsubmit={on_submit}>
                {
                    state.clock.clone().map(|clock| html! {
                        <div class="countdown" role="timer">{ clock }</div>
                    }).unwrap_or_default()
                }
                <div class="questionnaire-body">
                    <div class="question-column">
                        {
                            for page.questions.iter().enumerate().map(|(slot, prompt)| {
                                render_question(slot + 1, prompt, &state, view.is_active(slot + 1))
                            })
                        }
                        <div class="question-controls">
                            <button type="button" class="nav-button" hidden={!view.show_previous} onclick={on_back}>{"Previous"}</button>
                            <span class="question-progress">{ format!("{} / {}", view.active, view.total) }</span>
                            <button type="button" class="nav-button" hidden={!view.show_next} onclick={on_next}>{"Next"}</button>
                        </div>
                        <div class="submit-row" hidden={!completion.submit_visible()}>
                            <button type="submit" class="submit-button">{"Submit"}</button>
                        </div>
                    </div>
                    { render_guidance(&view.guidance, page.guidance.get(state.navigator.active_slot())) }
                </div>
                { render_hidden_fields(&form) }
            </form>
        }
    }

    fn schedule_tick(
        mut countdown: Countdown,
        delay_ms: f64,
        on_tick: Callback<Tick>,
        stopped: Rc<Cell<bool>>,
    ) {
        Timeout::new(delay_ms.round() as u32, move || {
            if stopped.get() {
                return;
            }
            let tick = countdown.tick(Date::now());
            on_tick.emit(tick);
            schedule_tick(countdown, tick.next_delay_ms, on_tick, stopped);
        })
        .forget();
    }

    fn render_question(
        question: usize,
        prompt: &str,
        state: &UseReducerHandle<QuestionnaireState>,
        active: bool,
    ) -> Html {
        let slot = question - 1;
        let value = state.answers.get(slot).cloned().unwrap_or_default();
        let name = SubmissionForm::answer_key(slot);

        if !active {
            return html! {
                <section class="question" hidden={true}>
                    <p class="question-prompt">{ prompt.to_string() }</p>
                    <input type="text" class="answer-input" name={name} value={value} />
                </section>
            };
        }

        let border = state
            .field_style
            .border_color()
            .map(|color| format!("border-color: {color}"));
        let list_open = state.autocomplete.is_open();

        let on_input = {
            let state = state.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                state.dispatch(Action::Input(input.value()));
            })
        };
        let on_focus = {
            let state = state.clone();
            Callback::from(move |_: FocusEvent| state.dispatch(Action::Focus))
        };
        let on_change = {
            let state = state.clone();
            Callback::from(move |_: Event| state.dispatch(Action::Validate))
        };
        let on_keydown = {
            let state = state.clone();
            Callback::from(move |event: KeyboardEvent| {
                let key = Key::from_dom(&event.key());
                let mut preview = state.autocomplete.clone();
                if preview.key(key, &state.vocabulary).prevents_default() {
                    event.prevent_default();
                }
                state.dispatch(Action::Key(key));
            })
        };

        html! {
            <section class="question is-active">
                <p class="question-prompt">
                    <span class="question-number">{ format!("Q{question}. ") }</span>
                    { prompt.to_string() }
                </p>
                <div class={ANSWER_FIELD_CLASS}>
                    <input
                        type="text"
                        class={classes!("answer-input", list_open.then_some("is-open"))}
                        name={name}
                        value={value}
                        style={border}
                        autocomplete="off"
                        placeholder="Type to search imaging studies"
                        oninput={on_input}
                        onfocus={on_focus}
                        onchange={on_change}
                        onkeydown={on_keydown}
                    />
                    { render_suggestions(state, list_open) }
                </div>
            </section>
        }
    }

    fn render_suggestions(state: &UseReducerHandle<QuestionnaireState>, open: bool) -> Html {
        let focus = state.autocomplete.focus();
        html! {
            <ul class="suggestion-list" role="listbox" hidden={!open}>
                {
                    for state.autocomplete.visible().iter().enumerate().filter_map(|(position, idx)| {
                        let entry = state.vocabulary.entries().get(*idx)?;
                        let onclick = {
                            let state = state.clone();
                            Callback::from(move |_: MouseEvent| state.dispatch(Action::Select(position)))
                        };
                        Some(html! {
                            <li
                                class={classes!("suggestion", (focus == Some(position)).then_some("is-focused"))}
                                role="option"
                                onclick={onclick}
                            >
                                { entry.label.clone() }
                            </li>
                        })
                    })
                }
            </ul>
        }
    }

    fn render_guidance(panels: &[GuidancePanel], blocks: Option<&Vec<GuidanceBlock>>) -> Html {
        let Some(blocks) = blocks.filter(|_| !panels.is_empty()) else {
            return Html::default();
        };

        html! {
            <aside class="guidance-column">
                <h2>{"ACR Appropriateness Criteria"}</h2>
                {
                    for panels.iter().filter_map(|panel| {
                        let block = blocks.get(panel.rank - 1)?;
                        Some(html! {
                            <details
                                key={panel.dom_id()}
                                id={panel.dom_id()}
                                class="guidance-panel"
                                open={panel.expanded()}
                            >
                                <summary>{ block.topic.clone() }</summary>
                                <table class="guidance-table">
                                    <thead>
                                        <tr>
                                            <th>{"Procedure"}</th>
                                            <th>{"Radiation"}</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        { for block.table.iter().map(render_guidance_row) }
                                    </tbody>
                                </table>
                            </details>
                        })
                    })
                }
            </aside>
        }
    }

    fn render_guidance_row(row: &GuidanceRow) -> Html {
        html! {
            <tr class="guidance-row" data-category={row.category.as_str()}>
                <td>{ row.procedure.clone() }</td>
                <td class="guidance-radiation">{ row.radiation.clone() }</td>
            </tr>
        }
    }

    fn render_hidden_fields(form: &SubmissionForm) -> Html {
        html! {
            <>
                {
                    for form.fields().into_iter().filter(|(key, _)| !is_answer_key(key)).map(|(key, value)| {
                        if key == HONEYPOT_FIELD {
                            html! {
                                <div class="hp-field" aria-hidden="true">
                                    <input type="text" name={key} value={value} tabindex="-1" autocomplete="off" />
                                </div>
                            }
                        } else {
                            html! { <input type="hidden" name={key} value={value} /> }
                        }
                    })
                }
            </>
        }
    }

    #[function_component(AccessGateView)]
    fn access_gate_view() -> Html {
        use_effect_with((), |_| {
            if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                if let Err(err) = styles::ensure_styles(&document) {
                    console::error_1(&err);
                }
            }
            || ()
        });

        let gate = use_state(AccessGate::default);
        let target = gate.continue_target();

        let on_consent = {
            let gate = gate.clone();
            Callback::from(move |event: Event| {
                let input: HtmlInputElement = event.target_unchecked_into();
                gate.set(AccessGate::new(input.checked(), gate.identifier.clone()));
            })
        };
        let on_identifier = {
            let gate = gate.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                gate.set(AccessGate::new(gate.consent, input.value()));
            })
        };
        let on_continue = {
            let target = target.clone();
            Callback::from(move |_: MouseEvent| {
                let Some(target) = target.as_deref() else {
                    return;
                };
                if let Some(window) = web_sys::window() {
                    if let Err(err) = window.location().set_href(target) {
                        console::error_1(&err);
                    }
                }
            })
        };

        html! {
            <div class="access-root">
                <label class="access-consent">
                    <input type="checkbox" checked={gate.consent} onchange={on_consent} />
                    {"I consent to take part in this study."}
                </label>
                <label class="access-identifier">
                    <span>{"Participant identifier"}</span>
                    <input
                        type="text"
                        value={gate.identifier.clone()}
                        oninput={on_identifier}
                        autocomplete="off"
                        spellcheck="false"
                    />
                    <span class="access-count">
                        { format!("{} / {UID_LENGTH}", gate.identifier.chars().count()) }
                    </span>
                </label>
                <button
                    type="button"
                    class={classes!("continue-button", target.is_some().then_some("is-ready"))}
                    disabled={target.is_none()}
                    onclick={on_continue}
                >
                    {"Continue"}
                </button>
            </div>
        }
    }

    fn find_element(selector: &str) -> Result<Element, JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| missing_element("window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| missing_element("document"))?;

        document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector {selector:?}: {err:?}")))?
            .ok_or_else(|| missing_element(selector))
    }

    fn missing_element(what: &str) -> JsValue {
        JsValue::from_str(&QuestionnaireError::MissingElement(what.to_string()).to_string())
    }

    #[wasm_bindgen]
    pub fn mount_questionnaire(selector: &str, page: JsValue) -> Result<(), JsValue> {
        let target = find_element(selector)?;
        let page: StudyPage = from_value(page)?;
        let navigator = page
            .navigator()
            .map_err(|err| JsValue::from_str(&format!("Invalid page: {err}")))?;

        yew::Renderer::<QuestionnaireView>::with_root_and_props(
            target,
            QuestionnaireProps { page, navigator },
        )
        .render();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn mount_access_gate(selector: &str) -> Result<(), JsValue> {
        let target = find_element(selector)?;
        yew::Renderer::<AccessGateView>::with_root(target).render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_access_gate, mount_questionnaire};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_questionnaire(
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "questionnaire-ui only supports the wasm32 target",
    ))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_access_gate(_: &str) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "questionnaire-ui only supports the wasm32 target",
    ))
}
