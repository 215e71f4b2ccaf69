//! Browser bindings for the checkout flow.
//!
//! `FetchOrderApi` posts to the page's own origin with `gloo-net`,
//! `DomResultSink` writes into the result region, and [`mount`] hands the
//! flow's hooks to the hosted `paypal.Buttons` widget.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Document, HtmlElement};

use super::js_error;
use crate::checkout::api::parse_body;
use crate::checkout::{
    CaptureOutcome, CheckoutError, CheckoutFlow, CreateOrderRequest, ORDERS_PATH, OrderApi, OrderId, ResultMessage,
    ResultSink, capture_path,
};
use crate::config::CheckoutConfig;

pub type BrowserCheckoutFlow = CheckoutFlow<FetchOrderApi, DomResultSink>;

#[wasm_bindgen]
extern "C" {
    type PaypalButtons;

    #[wasm_bindgen(js_namespace = paypal, js_name = Buttons, catch)]
    fn paypal_buttons(options: &js_sys::Object) -> Result<PaypalButtons, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn render(this: &PaypalButtons, container: &str) -> Result<js_sys::Promise, JsValue>;
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Same-origin `fetch` transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOrderApi;

impl FetchOrderApi {
    async fn send(request: gloo_net::http::Request) -> Result<Value, CheckoutError> {
        let resp = request.send().await.map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| CheckoutError::Transport(e.to_string()))?;
        tracing::debug!(url = %resp.url(), status, "order API responded");
        parse_body(status, &text)
    }
}

#[async_trait(?Send)]
impl OrderApi for FetchOrderApi {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Value, CheckoutError> {
        let request = gloo_net::http::Request::post(ORDERS_PATH)
            .json(request)
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        Self::send(request).await
    }

    async fn capture_order(&self, order_id: &OrderId) -> Result<Value, CheckoutError> {
        let request = gloo_net::http::Request::post(&capture_path(order_id))
            .header("Content-Type", "application/json")
            .build()
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        Self::send(request).await
    }
}

// =============================================================================
// RESULT REGION
// =============================================================================

pub struct DomResultSink {
    document: Document,
    result_selector: String,
    button_selector: String,
}

impl DomResultSink {
    pub fn new(config: &CheckoutConfig) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            result_selector: config.result_selector.clone(),
            button_selector: config.button_selector.clone(),
        })
    }
}

impl ResultSink for DomResultSink {
    fn replace(&self, message: &ResultMessage) {
        match self.document.query_selector(&self.result_selector) {
            Ok(Some(region)) => region.set_inner_html(&message.to_html()),
            _ => tracing::warn!(selector = %self.result_selector, "result region missing"),
        }
    }

    fn hide_button(&self) {
        let button = self
            .document
            .query_selector(&self.button_selector)
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if let Some(button) = button {
            let _ = button.style().set_property("display", "none");
        }
    }
}

// =============================================================================
// WIDGET
// =============================================================================

fn order_id_from(data: &JsValue) -> Option<OrderId> {
    js_sys::Reflect::get(data, &"orderID".into()).ok()?.as_string().map(OrderId::new)
}

fn restart(actions: &JsValue) -> Result<JsValue, JsValue> {
    let restart = js_sys::Reflect::get(actions, &"restart".into())?;
    let restart: js_sys::Function = restart.dyn_into()?;
    restart.call0(actions)
}

fn hook_options(flow: &Rc<BrowserCheckoutFlow>) -> Result<js_sys::Object, JsValue> {
    let options = js_sys::Object::new();

    let f = Rc::clone(flow);
    let create_order = Closure::<dyn FnMut() -> js_sys::Promise>::new(move || {
        let f = Rc::clone(&f);
        future_to_promise(async move {
            f.create_order()
                .await
                .map(|id| JsValue::from_str(id.as_str()))
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    });

    let f = Rc::clone(flow);
    let on_approve = Closure::<dyn FnMut(JsValue, JsValue) -> js_sys::Promise>::new(move |data, actions| {
        let f = Rc::clone(&f);
        future_to_promise(async move {
            let Some(order_id) = order_id_from(&data) else {
                f.on_error("approval carried no orderID");
                return Err(JsValue::from_str("approval carried no orderID"));
            };
            match f.capture_order(&order_id).await {
                CaptureOutcome::Restart => restart(&actions),
                CaptureOutcome::Succeeded(_) | CaptureOutcome::Failed(_) => Ok(JsValue::UNDEFINED),
            }
        })
    });

    let f = Rc::clone(flow);
    let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| f.on_error(&js_error(&err)));

    let f = Rc::clone(flow);
    let on_cancel = Closure::<dyn FnMut(JsValue)>::new(move |_data: JsValue| f.on_cancel());

    js_sys::Reflect::set(&options, &"createOrder".into(), create_order.as_ref())?;
    js_sys::Reflect::set(&options, &"onApprove".into(), on_approve.as_ref())?;
    js_sys::Reflect::set(&options, &"onError".into(), on_error.as_ref())?;
    js_sys::Reflect::set(&options, &"onCancel".into(), on_cancel.as_ref())?;

    // The widget keeps these for the page lifetime.
    create_order.forget();
    on_approve.forget();
    on_error.forget();
    on_cancel.forget();

    Ok(options)
}

/// Render the hosted buttons into the configured container with the flow's hooks.
///
/// # Errors
///
/// Returns the JS error if there is no document, the widget SDK is not
/// loaded, or rendering fails.
pub fn mount(config: CheckoutConfig) -> Result<Rc<BrowserCheckoutFlow>, JsValue> {
    let sink = DomResultSink::new(&config).ok_or_else(|| JsValue::from_str("document not available"))?;
    let container = config.button_selector.clone();
    let flow = Rc::new(CheckoutFlow::new(FetchOrderApi, sink, config));

    let options = hook_options(&flow)?;
    let buttons = paypal_buttons(&options)?;
    let rendered = buttons.render(&container)?;

    let f = Rc::clone(&flow);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = wasm_bindgen_futures::JsFuture::from(rendered).await {
            tracing::error!(error = %js_error(&e), "failed to render payment buttons");
            f.on_error(&js_error(&e));
        }
    });

    Ok(flow)
}
