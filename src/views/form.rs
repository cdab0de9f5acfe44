use askama::Template;
use std::net::SocketAddr;

use axum::Form;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::client::SubmitReceipt;
use crate::error::AppError;
use crate::merchant::form::{Field, FormInput};
use crate::merchant::{FormErrors, MerchantForm, build_sheet_row};
use crate::state::SharedState;
use crate::submission::metadata;

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    form: FormInput,
    errors: FieldMessages,
    location: String,
    submit_error: Option<String>,
}

#[derive(Template)]
#[template(path = "submitted.html")]
struct SubmittedTemplate {
    confirmed: bool,
}

#[derive(Default)]
struct FieldMessages {
    store_name: Option<String>,
    merchant_name: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    pin_code: Option<String>,
    location: Option<String>,
    interest: Option<String>,
}

impl From<&FormErrors> for FieldMessages {
    fn from(errors: &FormErrors) -> Self {
        let msg = |field: Field| errors.get(field).map(str::to_string);
        FieldMessages {
            store_name: msg(Field::StoreName),
            merchant_name: msg(Field::MerchantName),
            phone_number: msg(Field::PhoneNumber),
            address: msg(Field::Address),
            pin_code: msg(Field::PinCode),
            location: msg(Field::Location),
            interest: msg(Field::Interest),
        }
    }
}

fn render_form(
    status: StatusCode,
    input: FormInput,
    errors: &FormErrors,
    submit_error: Option<String>,
) -> Result<Response, AppError> {
    let location = MerchantForm::from(input.clone()).location();
    let template = FormTemplate {
        form: input,
        errors: FieldMessages::from(errors),
        location,
        submit_error,
    };
    Ok((status, Html(template.render()?)).into_response())
}

pub async fn show() -> Result<Response, AppError> {
    render_form(StatusCode::OK, FormInput::default(), &FormErrors::default(), None)
}

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(input): Form<FormInput>,
) -> Result<Response, AppError> {
    let form = MerchantForm::from(input.clone());

    let errors = form.validate();
    if !errors.is_empty() {
        tracing::debug!("Form rejected with {} invalid field(s)", errors.len());
        return render_form(StatusCode::UNPROCESSABLE_ENTITY, input, &errors, None);
    }

    let row = build_sheet_row(&form);
    let visitor = metadata::client_ip(&headers, Some(addr.ip()), &state.config.trusted_proxies);
    match state.sheet_client.submit(&row, Some(visitor)).await {
        Ok(receipt) => {
            let template = SubmittedTemplate {
                confirmed: receipt == SubmitReceipt::Confirmed,
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(e) => {
            tracing::warn!("Form submission failed: {e}");
            render_form(StatusCode::BAD_GATEWAY, input, &errors, Some(e))
        }
    }
}
