use aurum::{
    inquiries::{Inquiry, InquiryDesk, InquiryError, InquiryKind, InquiryReceipt, SimulatedInquiryDesk},
    modal::ModalKind,
    validation::{Field, ValidationErrors},
};
use leptos::prelude::*;
use tracing::{debug, warn};

use crate::{
    Stores, announce,
    modals::ModalFrame,
    timing::{Generation, spawn, wait_for_timeout},
};

/// Progress of a simulated submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    /// Waiting for input.
    #[default]
    Idle,

    /// Submission in flight.
    Submitting,

    /// Accepted with a reference.
    Sent(InquiryReceipt),

    /// Refused for a reason other than field validation.
    Failed(String),
}

/// Fields rendered for `kind`, in form order.
pub fn fields_for(kind: InquiryKind) -> &'static [Field] {
    match kind {
        InquiryKind::Wholesale => &[
            Field::Name,
            Field::Email,
            Field::Company,
            Field::Phone,
            Field::Message,
        ],
        InquiryKind::General | InquiryKind::Custom => {
            &[Field::Name, Field::Email, Field::Phone, Field::Message]
        }
    }
}

/// Inline message for `field`, if it failed validation.
pub fn field_error_text(errors: &ValidationErrors, field: Field) -> Option<String> {
    errors.for_field(field).map(ToString::to_string)
}

/// HTML input type for `field`.
pub fn input_type(field: Field) -> &'static str {
    match field {
        Field::Email => "email",
        Field::Phone => "tel",
        Field::Name | Field::Company | Field::Message | Field::Address | Field::City | Field::Country => {
            "text"
        }
    }
}

/// Message placeholder for each kind.
pub fn message_placeholder(kind: InquiryKind) -> &'static str {
    match kind {
        InquiryKind::General => "How can we help?",
        InquiryKind::Wholesale => "Volumes, products and delivery schedule",
        InquiryKind::Custom => "Describe the piece, engraving and occasion",
    }
}

/// Text field bound to a signal with an inline error slot.
#[component]
pub(crate) fn TextField(
    field: Field,
    value: RwSignal<String>,
    errors: RwSignal<ValidationErrors>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] multiline: bool,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let id = format!("field-{}", field.key());
    let error_id = format!("{id}-error");
    let error = move || errors.with(|errors| field_error_text(errors, field));

    let input = if multiline {
        view! {
            <textarea
                id=id.clone()
                rows="4"
                placeholder=placeholder
                aria-invalid=move || error().is_some().to_string()
                aria-describedby=error_id.clone()
                prop:value=move || value.get()
                on:input=move |event| value.set(event_target_value(&event))
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                id=id.clone()
                type=input_type
                placeholder=placeholder
                aria-invalid=move || error().is_some().to_string()
                aria-describedby=error_id.clone()
                prop:value=move || value.get()
                on:input=move |event| value.set(event_target_value(&event))
            />
        }
        .into_any()
    };

    view! {
        <div class="form-field" class:form-field-invalid=move || error().is_some()>
            <label for=id>{field.label()}</label>
            {input}
            <p id=error_id class="form-error" role="alert">{error}</p>
        </div>
    }
}

#[derive(Debug, Clone, Copy)]
struct InquiryFields {
    name: RwSignal<String>,
    email: RwSignal<String>,
    company: RwSignal<String>,
    phone: RwSignal<String>,
    message: RwSignal<String>,
}

impl InquiryFields {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            company: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            message: RwSignal::new(String::new()),
        }
    }

    fn signal(self, field: Field) -> RwSignal<String> {
        match field {
            Field::Email => self.email,
            Field::Company => self.company,
            Field::Phone => self.phone,
            Field::Message => self.message,
            Field::Name | Field::Address | Field::City | Field::Country => self.name,
        }
    }

    fn inquiry(self, kind: InquiryKind) -> Inquiry {
        Inquiry {
            kind,
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            company: self.company.get_untracked(),
            phone: self.phone.get_untracked(),
            message: self.message.get_untracked(),
        }
    }

    fn reset(self) {
        for signal in [self.name, self.email, self.company, self.phone, self.message] {
            signal.set(String::new());
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InquiryState {
    kind: RwSignal<InquiryKind>,
    fields: InquiryFields,
    errors: RwSignal<ValidationErrors>,
    status: RwSignal<SubmitStatus>,
    generation: Generation,
}

fn submit_inquiry(stores: Stores, state: InquiryState, delay_ms: i32) {
    if state.status.with_untracked(|status| *status == SubmitStatus::Submitting) {
        return;
    }

    let inquiry = state.fields.inquiry(state.kind.get_untracked());

    if let Err(errors) = inquiry.validate() {
        debug!(errors = errors.len(), "inquiry form incomplete");
        announce(stores.live_message, errors.to_string());
        state.errors.set(errors);
        return;
    }

    state.errors.set(ValidationErrors::default());
    state.status.set(SubmitStatus::Submitting);

    let run_id = state.generation.bump();

    spawn(async move {
        wait_for_timeout(delay_ms).await;

        if !state.generation.is_current(run_id) {
            return;
        }

        let outcome = SimulatedInquiryDesk.submit(inquiry).await;

        if !state.generation.is_current(run_id) {
            return;
        }

        match outcome {
            Ok(receipt) => {
                announce(
                    stores.live_message,
                    format!("Thank you. Your reference is {}.", receipt.reference),
                );
                state.fields.reset();
                state.status.set(SubmitStatus::Sent(receipt));
            }
            Err(InquiryError::Invalid(errors)) => {
                state.errors.set(errors);
                state.status.set(SubmitStatus::Idle);
            }
            Err(error) => {
                warn!(%error, "inquiry refused");
                state.status.set(SubmitStatus::Failed(error.to_string()));
            }
        }
    });
}

#[component]
fn KindTabs(kind: RwSignal<InquiryKind>, errors: RwSignal<ValidationErrors>) -> impl IntoView {
    view! {
        <div class="inquiry-kinds" role="tablist" aria-label="Enquiry type">
            {InquiryKind::ALL
                .into_iter()
                .map(|tab| {
                    view! {
                        <button
                            type="button"
                            role="tab"
                            class="inquiry-kind"
                            class:inquiry-kind-active=move || kind.get() == tab
                            aria-selected=move || (kind.get() == tab).to_string()
                            on:click=move |_| {
                                kind.set(tab);
                                errors.set(ValidationErrors::default());
                            }
                        >
                            {tab.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn InquiryFormBody(stores: Stores, state: InquiryState, delay_ms: i32) -> impl IntoView {
    let fields = move || {
        let kind = state.kind.get();

        fields_for(kind)
            .iter()
            .map(|field| {
                let field = *field;

                view! {
                    <TextField
                        field=field
                        value=state.fields.signal(field)
                        errors=state.errors
                        input_type={input_type(field)}
                        multiline={field == Field::Message}
                        placeholder={if field == Field::Message { message_placeholder(kind) } else { "" }}
                    />
                }
            })
            .collect_view()
    };

    let is_submitting = move || state.status.with(|status| *status == SubmitStatus::Submitting);

    view! {
        <KindTabs kind=state.kind errors=state.errors />
        <form
            class="inquiry-form"
            novalidate=true
            on:submit=move |event| {
                event.prevent_default();
                submit_inquiry(stores, state, delay_ms);
            }
        >
            {fields}
            {move || match state.status.get() {
                SubmitStatus::Sent(receipt) => Some(view! {
                    <p class="form-success" role="status">
                        {format!("{} received. Reference {}.", receipt.kind, receipt.reference)}
                    </p>
                }.into_any()),
                SubmitStatus::Failed(message) => Some(view! {
                    <p class="form-error" role="alert">{message}</p>
                }.into_any()),
                SubmitStatus::Idle | SubmitStatus::Submitting => None,
            }}
            <button type="submit" class="button button-primary" disabled=is_submitting>
                {move || if is_submitting() { "Sending…" } else { "Send enquiry" }}
            </button>
        </form>
    }
}

/// Contact section with the enquiry overlay.
#[component]
pub fn InquiryForm(
    /// Shared stores.
    stores: Stores,

    /// Simulated round-trip delay.
    delay_ms: i32,
) -> impl IntoView {
    let state = InquiryState {
        kind: RwSignal::new(InquiryKind::default()),
        fields: InquiryFields::new(),
        errors: RwSignal::new(ValidationErrors::default()),
        status: RwSignal::new(SubmitStatus::default()),
        generation: Generation::new(),
    };
    state.generation.cancel_on_cleanup();

    let open_with = move |kind: InquiryKind| {
        state.kind.set(kind);
        state.errors.set(ValidationErrors::default());

        if !state.status.with_untracked(|status| *status == SubmitStatus::Submitting) {
            state.status.set(SubmitStatus::Idle);
        }

        stores.open_modal(ModalKind::Inquiry);
    };

    let overlay = move || {
        stores
            .modals
            .with(|modals| modals.contains(ModalKind::Inquiry))
            .then(|| {
                view! {
                    <ModalFrame stores=stores kind=ModalKind::Inquiry title="Contact our desk".to_string()>
                        <InquiryFormBody stores=stores state=state delay_ms=delay_ms />
                    </ModalFrame>
                }
            })
    };

    view! {
        <section id="contact" class="contact">
            <header class="section-header">
                <p class="section-eyebrow">"Private Client Desk"</p>
                <h2 class="section-title">"Speak with a specialist"</h2>
            </header>
            <ul class="contact-options">
                {InquiryKind::ALL
                    .into_iter()
                    .map(|kind| {
                        view! {
                            <li class="contact-option">
                                <h3>{kind.label()}</h3>
                                <button type="button" class="button button-secondary" on:click=move |_| open_with(kind)>
                                    "Start enquiry"
                                </button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </section>
        {overlay}
    }
}

#[cfg(test)]
mod tests {
    use aurum::validation::FieldError;

    use super::*;

    #[test]
    fn company_only_asked_for_wholesale() {
        assert!(fields_for(InquiryKind::Wholesale).contains(&Field::Company));
        assert!(!fields_for(InquiryKind::General).contains(&Field::Company));
        assert!(!fields_for(InquiryKind::Custom).contains(&Field::Company));
    }

    #[test]
    fn every_validated_field_is_rendered() {
        for kind in InquiryKind::ALL {
            let errors = Inquiry {
                kind,
                ..Inquiry::default()
            }
            .validate()
            .err()
            .unwrap_or_default();

            assert!(
                errors
                    .iter()
                    .all(|error| fields_for(kind).contains(&error.field()))
            );
        }
    }

    #[test]
    fn contact_fields_use_matching_input_types() {
        assert_eq!(input_type(Field::Email), "email");
        assert_eq!(input_type(Field::Phone), "tel");
        assert_eq!(input_type(Field::Company), "text");
    }

    #[test]
    fn field_errors_render_inline_text() {
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::InvalidEmail);
        errors.push(FieldError::Required(Field::Name));

        assert_eq!(
            field_error_text(&errors, Field::Email),
            Some("Please enter a valid email address".to_string())
        );
        assert_eq!(
            field_error_text(&errors, Field::Name),
            Some("Name is required".to_string())
        );
        assert_eq!(field_error_text(&errors, Field::Message), None);
    }

    #[test]
    fn fields_map_to_their_own_signals() {
        let fields = InquiryFields::new();
        fields.email.set("desk@aurum.example".to_string());
        fields.company.set("Gulf Bullion".to_string());

        let inquiry = fields.inquiry(InquiryKind::Wholesale);

        assert_eq!(inquiry.email, "desk@aurum.example");
        assert_eq!(inquiry.company, "Gulf Bullion");
        assert_eq!(fields.signal(Field::Company).get_untracked(), "Gulf Bullion");

        fields.reset();

        assert!(fields.inquiry(InquiryKind::General).email.is_empty());
    }
}
