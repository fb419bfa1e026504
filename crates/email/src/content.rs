//! Shared email content
//!
//! Content generators used by both production (SES) and mock email services.

use crate::OrderCancellation;

/// Plain-text body for an order cancellation email.
pub fn order_cancellation_text(order: &OrderCancellation<'_>, base_url: &str) -> String {
    format!(
        "Hi,\n\n\
        Your order {} from {} has been canceled.\n\
        Order total: {}\n\n\
        Any captured payment will be refunded by the shop.\n\
        Visit {} to place a new order.\n\n\
        Thanks,\n\
        {}",
        order.order_number, order.distributor_name, order.total, base_url, order.distributor_name
    )
}

/// HTML body for an order cancellation email.
pub fn order_cancellation_html(order: &OrderCancellation<'_>, base_url: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2>Order {order_number} canceled</h2>
                    <p>Your order <strong>{order_number}</strong> from <strong>{distributor}</strong> has been canceled.</p>
                    <p>Order total: <strong>{total}</strong></p>
                    <p>Any captured payment will be refunded by the shop.</p>
                    <p><a href="{base_url}">Place a new order</a></p>
                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">
                    <p style="color: #666; font-size: 12px;">{distributor}</p>
                </div>
            </body>
            </html>
            "#,
        order_number = escape_html(order.order_number),
        distributor = escape_html(order.distributor_name),
        total = escape_html(order.total),
        base_url = escape_html(base_url),
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
