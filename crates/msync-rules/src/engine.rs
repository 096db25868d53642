use msync_schemas::{CatalogItem, ItemOption, OptionGroup};

use crate::{MarketplaceRules, ValidationIssue};

// Arithmetic is widened to i128 so extreme prices cannot overflow the
// subtraction or the remainder.
fn off_step(value: i64, base: i64, step: i64) -> bool {
    (i128::from(value) - i128::from(base)) % i128::from(step) != 0
}

fn check_item(rules: &MarketplaceRules, item: &CatalogItem, out: &mut Vec<ValidationIssue>) {
    let price = &rules.price;

    // 1. price floor
    if item.price < price.min {
        out.push(ValidationIssue::new(
            &item.id,
            "price",
            format!("price {} is below the minimum of {}", item.price, price.min),
        ));
    }

    // 2. price step
    if off_step(item.price, price.min, price.step) {
        out.push(ValidationIssue::new(
            &item.id,
            "price",
            format!("price {} is not on the {} step", item.price, price.step),
        ));
    }

    // 3. name length
    if item.name.chars().count() > rules.name.max_len {
        out.push(ValidationIssue::new(
            &item.id,
            "name",
            format!("name is longer than {} characters", rules.name.max_len),
        ));
    }

    // 4. description length
    if item.description.chars().count() > rules.desc.max_len {
        out.push(ValidationIssue::new(
            &item.id,
            "desc",
            format!("description is longer than {} characters", rules.desc.max_len),
        ));
    }

    // 5. group count
    let max_groups = rules.option_group.max_groups_per_item;
    if item.option_groups.len() > max_groups {
        out.push(ValidationIssue::new(
            &item.id,
            "optionGroup",
            format!(
                "{} option groups exceed the limit of {max_groups}",
                item.option_groups.len()
            ),
        ));
    }

    for group in &item.option_groups {
        check_group(rules, &item.id, group, out);
    }
}

fn check_group(
    rules: &MarketplaceRules,
    item_id: &str,
    group: &OptionGroup,
    out: &mut Vec<ValidationIssue>,
) {
    let g = &rules.option_group;
    let field = format!("optionGroup:{}", group.id);

    // 6. minSelect floor
    if group.min < g.min_select {
        out.push(ValidationIssue::new(
            item_id,
            &field,
            format!("minimum selection must be at least {}", g.min_select),
        ));
    }

    // 7. maxSelect ceiling
    if group.max > g.max_select {
        out.push(ValidationIssue::new(
            item_id,
            &field,
            format!("maximum selection must be at most {}", g.max_select),
        ));
    }

    // 8. internal consistency, independent of 6/7
    if group.min > group.max {
        out.push(ValidationIssue::new(
            item_id,
            &field,
            format!(
                "minimum selection {} is greater than maximum selection {}",
                group.min, group.max
            ),
        ));
    }

    // 9. required if min > 0
    if g.require_if_min_gt0 && group.min > 0 && !group.required {
        out.push(ValidationIssue::new(
            item_id,
            &field,
            "group with a positive minimum selection must be required",
        ));
    }

    // 10. options per group
    let max_options = rules.option.max_options_per_group;
    if group.options.len() > max_options {
        out.push(ValidationIssue::new(
            item_id,
            &field,
            format!(
                "{} options exceed the limit of {max_options}",
                group.options.len()
            ),
        ));
    }

    // 11. option price-delta step
    if let Some(step) = rules.option.delta_step() {
        for option in &group.options {
            check_option(item_id, option, step, out);
        }
    }
}

fn check_option(item_id: &str, option: &ItemOption, step: i64, out: &mut Vec<ValidationIssue>) {
    if off_step(option.price_delta, 0, step) {
        out.push(ValidationIssue::new(
            item_id,
            format!("option:{}", option.id),
            format!(
                "price delta {} is not on the {step} step",
                option.price_delta
            ),
        ));
    }
}

/// Validate every item against one marketplace's rules.
///
/// Non-short-circuiting: all violations of all items are returned, items in
/// input order, checks in a fixed order per item. Empty means the batch may
/// be applied.
pub fn validate_items(rules: &MarketplaceRules, items: &[CatalogItem]) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    for item in items {
        check_item(rules, item, &mut out);
    }
    out
}
