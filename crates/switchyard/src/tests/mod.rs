//! Crate-level integration and BDD tests.

use rstest::rstest;

use crate::{
    ActionConfig, CallableRegistry, Dispatcher, DispatcherConfig, Request, Response,
    TracingObserver, handler_fn,
};


/// Application environment for the end-to-end tests.
#[derive(Debug, PartialEq, Eq)]
struct Tenant {
    id: u32,
}

fn registry() -> CallableRegistry<Tenant, u32, String> {
    let mut registry = CallableRegistry::new();
    registry
        .register_handler(
            "invoices.issue",
            handler_fn(|request: &Request<Tenant, u32>| {
                let amount = *request.input();
                if amount == 0 {
                    return Ok(request.error("amount must be positive".to_owned()));
                }
                Ok(request.success(format!("invoice for tenant {} of {amount}", request.env().id)))
            }),
        )
        .expect("register handler");
    registry
        .register_observer("audit.trace", TracingObserver)
        .expect("register observer");
    registry
}

fn dispatcher() -> Dispatcher<Tenant, u32, String> {
    let config: DispatcherConfig<Tenant, u32, String> = [(
        "invoices.issue",
        ActionConfig::new()
            .with_handler_ref("invoices.issue")
            .with_observer_ref("audit.trace"),
    )]
    .into_iter()
    .collect();
    Dispatcher::coerce(config, &registry()).expect("configuration resolves")
}

#[rstest]
#[case::issued(250, true, "invoice for tenant 7 of 250")]
#[case::rejected(0, false, "amount must be positive")]
fn end_to_end_dispatch_through_registry(
    #[case] amount: u32,
    #[case] success: bool,
    #[case] output: &str,
) {
    let response = dispatcher()
        .call("invoices.issue", amount, Tenant { id: 7 })
        .expect("invoices.issue is registered");

    assert_eq!(response.is_success(), success);
    assert_eq!(response.env(), &Tenant { id: 7 });
    assert_eq!(response.output(), output);
}

#[test]
fn presenter_wraps_output_without_changing_the_outcome() {
    let response: Response<Tenant, u32, String> = dispatcher()
        .call("invoices.issue", 0, Tenant { id: 1 })
        .expect("invoices.issue is registered");
    let request = response.request().clone();

    let presented = response.map_output(|message| format!("<p>{message}</p>"));

    assert!(presented.is_failure());
    assert!(presented.request().ptr_eq(&request));
    assert_eq!(presented.output(), "<p>amount must be positive</p>");
}
