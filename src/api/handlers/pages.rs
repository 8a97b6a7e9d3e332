use axum::Form;
use axum::response::{Html, Redirect};

use crate::api::error::ApiError;
use crate::api::render;
use crate::api::types::{LadderForm, parse_request};
use crate::market::OptionSide;

pub async fn index() -> Html<String> {
    Html(render::index_page())
}

pub async fn call_form() -> Html<String> {
    Html(render::form_page(OptionSide::Call))
}

pub async fn put_form() -> Html<String> {
    Html(render::form_page(OptionSide::Put))
}

pub async fn submit_calls(Form(form): Form<LadderForm>) -> Result<Redirect, ApiError> {
    submit(OptionSide::Call, form)
}

pub async fn submit_puts(Form(form): Form<LadderForm>) -> Result<Redirect, ApiError> {
    submit(OptionSide::Put, form)
}

/// Validate the form and redirect to the matching data page.
fn submit(side: OptionSide, form: LadderForm) -> Result<Redirect, ApiError> {
    let request = parse_request(side, &form.ticker_1, &form.date_1, &form.years_1)?;
    Ok(Redirect::to(&request.page_path()))
}
