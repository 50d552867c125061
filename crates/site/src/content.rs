//! Static copy for the site's sections and pages.

pub const COMPANY: &str = "Northwind Studio";
pub const TAGLINE: &str = "We design and build digital products people love to use.";
pub const CONTACT_EMAIL: &str = "hello@northwind.example";

pub struct Service {
    pub title: &'static str,
    pub summary: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        title: "Web Development",
        summary: "Fast, accessible sites and web apps built to scale with your business.",
    },
    Service {
        title: "UI/UX Design",
        summary: "Research-led interfaces that turn visitors into customers.",
    },
    Service {
        title: "Brand Identity",
        summary: "Logos, type and colour systems that make you recognisable.",
    },
    Service {
        title: "Digital Marketing",
        summary: "Campaigns and content measured against the numbers that matter.",
    },
];

pub struct Project {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
}

pub const PROJECTS: &[Project] = &[
    Project {
        slug: "harbor-finance",
        title: "Harbor Finance",
        category: "Web App",
        summary: "A budgeting dashboard that cut onboarding time in half.",
    },
    Project {
        slug: "greenleaf-market",
        title: "Greenleaf Market",
        category: "E-commerce",
        summary: "Storefront redesign for an organic grocery delivery service.",
    },
    Project {
        slug: "atlas-fitness",
        title: "Atlas Fitness",
        category: "Branding",
        summary: "Identity and launch site for a chain of boutique gyms.",
    },
    Project {
        slug: "lumen-health",
        title: "Lumen Health",
        category: "Mobile",
        summary: "Patient scheduling app with a 4.8 star store rating.",
    },
];

pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "They understood our customers better than we did.",
        author: "Maya Chen",
        role: "CEO, Harbor Finance",
    },
    Testimonial {
        quote: "Launched on time, on budget, and sales are up 40%.",
        author: "Daniel Okafor",
        role: "Founder, Greenleaf Market",
    },
    Testimonial {
        quote: "The new brand finally looks like the company we are.",
        author: "Sofia Marquez",
        role: "Marketing Lead, Atlas Fitness",
    },
];

pub struct Plan {
    pub name: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
    pub featured: bool,
}

pub const PLANS: &[Plan] = &[
    Plan {
        name: "Starter",
        price: "$2,500",
        features: &["Five-page website", "Responsive design", "Basic SEO"],
        featured: false,
    },
    Plan {
        name: "Growth",
        price: "$6,000",
        features: &[
            "Custom web app",
            "Design system",
            "Analytics setup",
            "Three months support",
        ],
        featured: true,
    },
    Plan {
        name: "Enterprise",
        price: "Custom",
        features: &["Dedicated team", "Ongoing retainer", "Priority support"],
        featured: false,
    },
];

pub struct Member {
    pub name: &'static str,
    pub role: &'static str,
}

pub const TEAM: &[Member] = &[
    Member {
        name: "Avery Holt",
        role: "Creative Director",
    },
    Member {
        name: "Jordan Reyes",
        role: "Lead Engineer",
    },
    Member {
        name: "Priya Nair",
        role: "Product Designer",
    },
    Member {
        name: "Sam Whitaker",
        role: "Growth Strategist",
    },
];

pub struct Policy {
    pub heading: &'static str,
    pub body: &'static str,
}

pub const PRIVACY_POLICY: &[Policy] = &[
    Policy {
        heading: "Information we collect",
        body: "We collect the name, email address and message you send through our contact form.",
    },
    Policy {
        heading: "How we use it",
        body: "Only to reply to your enquiry. We never sell or share your details.",
    },
];

pub const TERMS_OF_SERVICE: &[Policy] = &[
    Policy {
        heading: "Engagements",
        body: "Every project is governed by a written statement of work agreed before it starts.",
    },
    Policy {
        heading: "Intellectual property",
        body: "Deliverables transfer to you once the final invoice has been paid.",
    },
];

pub const REFUND_POLICY: &[Policy] = &[
    Policy {
        heading: "Deposits",
        body: "Deposits are refundable until discovery work begins.",
    },
    Policy {
        heading: "Milestones",
        body: "Completed milestones are not refundable; unstarted milestones are.",
    },
];

pub const COOKIES_POLICY: &[Policy] = &[
    Policy {
        heading: "Essential cookies",
        body: "We set a single cookie to remember your theme preference.",
    },
    Policy {
        heading: "Analytics",
        body: "Anonymous, aggregate analytics only. No advertising trackers.",
    },
];
