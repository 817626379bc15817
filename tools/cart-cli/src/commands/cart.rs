//! Cart commands.

use anyhow::{bail, Result};
use turbo_cart::cart::{Cart, UpdateProductAmount};

use super::{AddArgs, RemoveArgs, UpdateArgs};
use crate::context::{Context, Session};
use crate::output::format_price;

/// Show the cart.
pub async fn list(ctx: &Context) -> Result<()> {
    let session = ctx.open_store()?;
    print_cart(&session.store.cart(), ctx);
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_store()?;

    let spinner = ctx
        .output
        .spinner(&format!("Adding product {}...", args.product_id));
    session.store.add_product(args.product_id).await;
    spinner.finish_and_clear();

    finish(&session, ctx, &format!("Added product {}", args.product_id))
}

/// Remove a product.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_store()?;
    session.store.remove_product(args.product_id).await;
    finish(&session, ctx, &format!("Removed product {}", args.product_id))
}

/// Set the quantity of a product.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_store()?;
    apply_update(&session, args, ctx).await
}

async fn apply_update(session: &Session, args: UpdateArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.product_id));
    session
        .store
        .update_product_amount(UpdateProductAmount::new(args.product_id, args.amount))
        .await;
    spinner.finish_and_clear();

    // The stock lookup runs before the amount is checked, so a
    // non-positive amount can still raise a notice.
    fail_on_notice(session)?;

    if args.amount <= 0 {
        ctx.output
            .info("Quantity must be at least 1, cart left unchanged");
        print_cart(&session.store.cart(), ctx);
        return Ok(());
    }

    ctx.output
        .success(&format!("Set product {} to {}", args.product_id, args.amount));
    print_cart(&session.store.cart(), ctx);
    Ok(())
}

/// Fail with the notice the operation raised, if any.
fn fail_on_notice(session: &Session) -> Result<()> {
    if let Some(notice) = session.notices.take().into_iter().next() {
        bail!("{}", notice);
    }
    Ok(())
}

/// Fail with the notice the operation raised, or report success.
fn finish(session: &Session, ctx: &Context, success: &str) -> Result<()> {
    fail_on_notice(session)?;

    ctx.output.success(success);
    print_cart(&session.store.cart(), ctx);
    Ok(())
}

fn print_cart(cart: &Cart, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(cart);
        return;
    }

    if cart.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }

    ctx.output.header("Cart");
    let widths = [8, 32, 10, 6];
    ctx.output
        .table_row(&["ID", "TITLE", "PRICE", "AMOUNT"], &widths);

    for item in cart {
        let id = item.id().to_string();
        let price = format_price(item.product.price());
        let amount = item.amount.to_string();
        ctx.output.table_row(
            &[
                id.as_str(),
                item.product.title().unwrap_or("-"),
                price.as_str(),
                amount.as_str(),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("products", &cart.len().to_string());
    ctx.output.kv("units", &cart.total_units().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use turbo_cache::MemoryStorage;
    use turbo_cart::api::InMemoryStorefront;
    use turbo_cart::catalog::Product;
    use turbo_cart::config::CartConfig;
    use turbo_cart::notify::RecordingNotifier;
    use turbo_cart::{CartStore, ProductId};

    use crate::output::Output;

    fn context() -> Context {
        Context {
            config: CartConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: PathBuf::from("/work"),
        }
    }

    fn session(storefront: Arc<InMemoryStorefront>) -> Session {
        let notices = Arc::new(RecordingNotifier::new());
        let store = CartStore::builder(storefront.clone(), storefront, MemoryStorage::new())
            .notifier(notices.clone())
            .build();
        Session { store, notices }
    }

    fn update_args(id: u64, amount: i64) -> UpdateArgs {
        UpdateArgs {
            product_id: ProductId::new(id),
            amount,
        }
    }

    #[tokio::test]
    async fn test_non_positive_update_fails_when_lookup_fails() {
        let storefront = Arc::new(InMemoryStorefront::new());
        storefront.set_unavailable(true);
        let session = session(storefront);

        let err = apply_update(&session, update_args(1, 0), &context())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error changing product quantity");
    }

    #[tokio::test]
    async fn test_non_positive_update_is_ok_when_lookup_succeeds() {
        let storefront = Arc::new(InMemoryStorefront::new().with_product(Product::new(1u64), 5));
        let session = session(storefront);

        assert!(apply_update(&session, update_args(1, 0), &context())
            .await
            .is_ok());
        assert!(session.notices.notices().is_empty());
    }

    #[tokio::test]
    async fn test_update_above_stock_fails() {
        let storefront = Arc::new(InMemoryStorefront::new().with_product(Product::new(1u64), 1));
        let session = session(storefront);
        session.store.add_product(ProductId::new(1)).await;

        let err = apply_update(&session, update_args(1, 3), &context())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Requested quantity is out of stock");
        assert_eq!(session.store.cart().get(ProductId::new(1)).unwrap().amount, 1);
    }
}
