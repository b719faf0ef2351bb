// storefront/src/contact.rs

//! WhatsApp link, fixed content pages and order tracking.

use serde::Serialize;

use crate::backend::Backend;
use crate::errors::{AppError, Result};
use crate::models::{OrderStatus, PaymentStatus};

pub fn whatsapp_link(number: &str, message: &str) -> String {
  format!("https://wa.me/{}?text={}", number, urlencoding::encode(message))
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
  pub heading: &'static str,
  pub body: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContentPage {
  pub slug: &'static str,
  pub title: &'static str,
  pub intro: &'static str,
  pub sections: &'static [Section],
}

pub const PAGES: &[ContentPage] = &[
  ContentPage {
    slug: "shipping",
    title: "Shipping & Delivery",
    intro: "At Olira, we ensure that your orders reach you in perfect condition and on time.",
    sections: &[
      Section {
        heading: "Shipping Charges",
        body: &["We offer Free Shipping on all orders above ₹2000 within India. For orders below ₹2000, a standard shipping charge of ₹100 applies."],
      },
      Section {
        heading: "Delivery Time",
        body: &["Orders are usually dispatched within 24-48 hours of placement. Standard delivery time is 3-7 business days depending on your location."],
      },
      Section {
        heading: "International Shipping",
        body: &["Currently, we only ship within India. We are working on bringing Olira to the world soon."],
      },
    ],
  },
  ContentPage {
    slug: "returns",
    title: "Returns & Exchanges",
    intro: "We want you to love your purchase. If you didn't love it, we're here to help.",
    sections: &[
      Section {
        heading: "Return Policy",
        body: &["We accept returns within 7 days of delivery. The product must be unused, unwashed, and with all original tags intact."],
      },
      Section {
        heading: "How to Return",
        body: &[
          "Go to the 'Track Order' page or contact our customer support.",
          "Enter your order details and select the item you wish to return.",
          "Our courier partner will pick up the package within 2-3 business days.",
        ],
      },
      Section {
        heading: "Refunds",
        body: &["Once we receive and inspect the product, your refund will be processed to your original payment method within 5-7 business days."],
      },
    ],
  },
  ContentPage {
    slug: "faq",
    title: "Frequently Asked Questions",
    intro: "",
    sections: &[
      Section {
        heading: "How do I place an order?",
        body: &["Simply browse our collection, select your size, and click 'Add to Cart'. Once you're ready, proceed to checkout and follow the steps to complete your purchase."],
      },
      Section {
        heading: "What payment methods do you accept?",
        body: &["We accept all major credit/debit cards, UPI, Net Banking, and Cash on Delivery (COD) for select locations."],
      },
      Section {
        heading: "Can I cancel my order?",
        body: &["Yes, you can cancel your order within 24 hours of placing it. Please contact our customer support immediately."],
      },
      Section {
        heading: "Do you ship internationally?",
        body: &["Currently, we only ship within India. We plan to expand our shipping to international locations soon."],
      },
      Section {
        heading: "How can I track my order?",
        body: &["Once your order is shipped, you will receive a tracking link via email and SMS. You can also track it on our website under 'Track Order'."],
      },
    ],
  },
  ContentPage {
    slug: "about",
    title: "Our Story",
    intro: "Modesty Made Modern. Redefining elegance for the contemporary woman.",
    sections: &[
      Section {
        heading: "The Art of Elegance",
        body: &[
          "At Oliraa, we believe that modesty is not just a style choice. It is a statement of grace, confidence, and individuality.",
          "Every piece in our collection is thoughtfully designed to offer the perfect blend of coverage, comfort, and chic style.",
        ],
      },
      Section {
        heading: "Our Core Values",
        body: &[
          "Uncompromised Quality: We source only the finest fabrics to ensure comfort and durability in every stitch.",
          "Modern Modesty: Contemporary designs that respect your values without sacrificing style.",
          "Sustainable Fashion: Committed to ethical production practices and reducing our environmental footprint.",
        ],
      },
    ],
  },
  ContentPage {
    slug: "size-guide",
    title: "Size Guide",
    intro: "Use this guide to choose the right size for a perfect fit.",
    sections: &[
      Section {
        heading: "Measurements (inches: bust / waist / hips)",
        body: &[
          "XS: 32 / 26 / 34",
          "S: 34 / 28 / 36",
          "M: 36 / 30 / 38",
          "L: 38 / 32 / 40",
          "XL: 40 / 34 / 42",
          "XXL: 42 / 36 / 44",
        ],
      },
      Section {
        heading: "Notes",
        body: &[
          "Garment measurements may vary slightly depending on style and fabric.",
          "If you are between sizes, we recommend sizing up for a comfortable fit.",
        ],
      },
    ],
  },
  ContentPage {
    slug: "privacy",
    title: "Privacy Policy",
    intro: "",
    sections: &[
      Section {
        heading: "Information We Collect",
        body: &["We collect information you provide directly to us, such as when you create an account, make a purchase, or contact us. This may include your name, email, address, and payment details."],
      },
      Section {
        heading: "How We Use Your Information",
        body: &["We use your information to process orders, communicate with you, and improve our services."],
      },
      Section {
        heading: "Sharing of Information",
        body: &["We do not sell or rent your personal information to third parties. We may share information with trusted service providers who assist us in operating our website and conducting our business."],
      },
    ],
  },
  ContentPage {
    slug: "terms",
    title: "Terms of Service",
    intro: "Welcome to Oliraa. By accessing or using our website, you agree to be bound by these Terms of Service.",
    sections: &[
      Section {
        heading: "1. Use of Website",
        body: &["You may use our website only for lawful purposes. You are prohibited from violating or attempting to violate the security of the website."],
      },
      Section {
        heading: "2. Product Information",
        body: &["We make every effort to display as accurately as possible the colors and features of our products. However, we cannot guarantee that your monitor's display of any color will be accurate."],
      },
      Section {
        heading: "3. Pricing",
        body: &["All prices are subject to change without notice. We reserve the right to modify or discontinue any product at any time."],
      },
      Section {
        heading: "4. Governing Law",
        body: &["These terms shall be governed by and construed in accordance with the laws of India."],
      },
    ],
  },
  ContentPage {
    slug: "cookies",
    title: "Cookie Policy",
    intro: "This Cookie Policy explains how Oliraa uses cookies and similar technologies to recognize you when you visit our website.",
    sections: &[
      Section {
        heading: "What are Cookies?",
        body: &["Cookies are small data files that are placed on your computer or mobile device when you visit a website."],
      },
      Section {
        heading: "How We Use Cookies",
        body: &["We use cookies to understand how you interact with our website, remember your preferences, and improve your user experience."],
      },
      Section {
        heading: "Managing Cookies",
        body: &["You can control and manage cookies in various ways. You can change your browser settings to disable or delete cookies."],
      },
    ],
  },
  ContentPage {
    slug: "return-policy",
    title: "Return Policy",
    intro: "Last Updated: January 2025",
    sections: &[
      Section {
        heading: "Eligibility",
        body: &["We accept returns for store credit or refund within 7 days of delivery. Items must be in original condition with tags attached."],
      },
      Section {
        heading: "Non-Returnable Items",
        body: &["Custom ordered items", "Sale items", "Gift cards"],
      },
      Section {
        heading: "Damaged or Defective Items",
        body: &["If you receive a damaged or defective item, please contact us immediately at hello@oliraa.com with details and photos of the product."],
      },
    ],
  },
];

pub fn page(slug: &str) -> Option<&'static ContentPage> {
  PAGES.iter().find(|p| p.slug == slug)
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackedOrder {
  pub order_number: String,
  pub order_status: OrderStatus,
  pub payment_status: PaymentStatus,
  pub message: String,
}

pub async fn track_order(backend: &dyn Backend, order_number: &str) -> Result<TrackedOrder> {
  let order_number = order_number.trim();
  let order = backend
    .order_by_number(order_number)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order #{} was not found.", order_number)))?;
  let message = match order.order_status {
    OrderStatus::Pending => format!("Order #{} is currently being processed at our warehouse.", order.order_number),
    OrderStatus::Completed => format!("Order #{} has been completed.", order.order_number),
    OrderStatus::Cancelled => format!("Order #{} was cancelled.", order.order_number),
  };
  Ok(TrackedOrder {
    order_number: order.order_number,
    order_status: order.order_status,
    payment_status: order.payment_status,
    message,
  })
}
