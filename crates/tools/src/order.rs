//! Coffee order tools.

use parley_core::domain::order::{self, SCHEMA};
use parley_core::error::SlotError;
use parley_core::log::SessionLog;
use parley_core::record::SessionRecord;
use parley_core::tool::ToolRegistry;
use std::sync::Arc;

use crate::finalize::FinalizeTool;
use crate::slot::{AddItemTool, SetFieldTool};
use crate::status::StatusTool;

pub fn register(registry: &mut ToolRegistry, log: Arc<dyn SessionLog>) -> Result<(), SlotError> {
    registry.register(Box::new(
        SetFieldTool::new(
            "update_drink_type",
            "Update the drink type in the order.",
            &SCHEMA,
            order::DRINK_TYPE,
            "drink_type",
        )?
        .with_value_description(
            "The type of coffee drink (e.g., latte, cappuccino, americano, espresso, mocha)",
        )
        .with_ack("Got it! {value}."),
    ));
    registry.register(Box::new(
        SetFieldTool::new("update_size", "Update the size in the order.", &SCHEMA, order::SIZE, "size")?
            .with_value_description("The size of the drink (e.g., small, medium, large)")
            .with_ack("Perfect! {value} it is."),
    ));
    registry.register(Box::new(
        SetFieldTool::new(
            "update_milk",
            "Update the milk type in the order.",
            &SCHEMA,
            order::MILK,
            "milk",
        )?
        .with_value_description("The milk (e.g., whole, skim, oat, almond, soy, none)")
        .with_ack("Perfect! {value}."),
    ));
    registry.register(Box::new(
        SetFieldTool::new(
            "update_name",
            "Update the customer's name for the order.",
            &SCHEMA,
            order::NAME,
            "name",
        )?
        .with_value_description("The customer's name")
        .with_ack("Thanks {value}!"),
    ));
    registry.register(Box::new(
        AddItemTool::new(
            "add_extra",
            "Add an extra to the order. Can be called once per extra.",
            &SCHEMA,
            order::EXTRAS,
            "extra",
        )?
        .with_value_description("An extra (e.g., whipped cream, vanilla syrup, caramel, extra shot)")
        .with_acks("Added {value} to your order.", "{value} is already in your order."),
    ));
    registry.register(Box::new(StatusTool::new(
        "check_order_status",
        "Check the current status of the order and see what information is still needed. \
         Use this to understand what questions to ask next.",
        &SCHEMA,
        describe_complete,
    )));
    registry.register(Box::new(
        FinalizeTool::new(
            "complete_order",
            "Complete and save the order. Only call this when all required fields are filled.",
            &SCHEMA,
            log,
            confirm,
        )
        .with_action("complete order"),
    ));
    Ok(())
}

fn field(record: &SessionRecord, name: &str) -> String {
    record.text_by_name(name).unwrap_or_default().to_string()
}

fn extras(record: &SessionRecord) -> Option<String> {
    let extras = record.list_by_name(order::EXTRAS);
    (!extras.is_empty()).then(|| extras.join(", "))
}

/// "large latte with oat"
fn drink(record: &SessionRecord) -> String {
    format!(
        "{} {} with {}",
        field(record, order::SIZE),
        field(record, order::DRINK_TYPE),
        field(record, order::MILK)
    )
}

fn describe_complete(record: &SessionRecord) -> String {
    format!(
        "Order is complete! Here's what we have: {}, extras: {}, for {}.",
        drink(record),
        extras(record).unwrap_or_else(|| "none".into()),
        field(record, order::NAME)
    )
}

fn confirm(record: &SessionRecord) -> String {
    format!(
        "Perfect! I've saved your order: {}, {}. Thanks {}, your order will be ready soon!",
        drink(record),
        extras(record).unwrap_or_else(|| "no extras".into()),
        field(record, order::NAME)
    )
}
