pub mod configuration;

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
            pub mod piecewiselinear;
        }
    }
    pub mod round;
    pub mod trapezoid;
}

pub mod profile {
    pub mod profileerror;
    pub mod profile;
    pub mod depthprofile;
    pub mod lateralprofile;
    pub mod profilekind;
}

pub mod reader {
    pub mod readererror;
    pub mod dattable;
    pub mod measurement;
    pub mod filereader;
}

pub mod report {
    pub mod metricsummary;
}
